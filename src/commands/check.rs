//! `braid check` — load an export and verify the discussion-tree invariants.

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::data::loader;
use crate::data::model::Post;
use crate::tree::model::TreeNode;
use crate::tree::transform::build_tree;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

pub fn run(source: &str) -> Result<()> {
    let posts = loader::load_posts(source);
    if posts.is_empty() {
        println!("  No posts.");
        return Ok(());
    }

    let reports: Vec<PostReport> = posts.iter().map(check_post).collect();
    print_reports(&reports);

    let violations: usize = reports.iter().map(|r| r.violations.len()).sum();
    if violations > 0 {
        bail!(
            "{violations} invariant violation{} found",
            if violations == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Computation (testable, no I/O)
// ---------------------------------------------------------------------------

/// Check results for a single post.
#[derive(Debug)]
pub struct PostReport {
    pub post_id: String,
    pub label: String,
    pub node_count: usize,
    pub comment_count: usize,
    pub violations: Vec<String>,
}

impl PostReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Transform one post and verify every tree invariant on the result.
pub fn check_post(post: &Post) -> PostReport {
    let tree = build_tree(post);
    let mut violations = Vec::new();

    let node_count = tree.count();
    if node_count != 1 + post.comments.len() {
        violations.push(format!(
            "node count is {node_count}, expected {}",
            1 + post.comments.len()
        ));
    }

    if tree.depth != 0 {
        violations.push(format!("root depth is {}, expected 0", tree.depth));
    }
    if tree.parent_id.is_some() {
        violations.push("root has a parent".to_string());
    }

    check_linkage(&tree, &mut violations);

    // Every node's ancestor chain must run from the root and span depth + 1
    // entries.
    tree.visit(&mut |node| match tree.chain(&node.id) {
        None => violations.push(format!("{}: no chain to the root", node.id)),
        Some(chain) => {
            if chain.len() != node.depth as usize + 1 {
                violations.push(format!(
                    "{}: chain length {} does not match depth {}",
                    node.id,
                    chain.len(),
                    node.depth
                ));
            }
            if chain.first().map(|n| n.id.as_str()) != Some(tree.id.as_str()) {
                violations.push(format!("{}: chain does not start at the root", node.id));
            }
        }
    });

    PostReport {
        post_id: post.post_id.clone(),
        label: post.label(),
        node_count,
        comment_count: post.comments.len(),
        violations,
    }
}

fn check_linkage(node: &TreeNode, violations: &mut Vec<String>) {
    for child in &node.children {
        if child.depth != node.depth + 1 {
            violations.push(format!(
                "{}: depth {} under parent at depth {}",
                child.id, child.depth, node.depth
            ));
        }
        if child.parent_id.as_deref() != Some(node.id.as_str()) {
            violations.push(format!(
                "{}: parent pointer {:?} does not match actual parent {}",
                child.id, child.parent_id, node.id
            ));
        }
        check_linkage(child, violations);
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_reports(reports: &[PostReport]) {
    for report in reports {
        let counts = format!(
            "[{} node{}, {} comment{}]",
            report.node_count,
            if report.node_count == 1 { "" } else { "s" },
            report.comment_count,
            if report.comment_count == 1 { "" } else { "s" }
        );
        if report.is_clean() {
            println!(
                "  {} {}  {}  {}",
                "ok".green(),
                report.post_id,
                report.label,
                counts.dark_grey()
            );
        } else {
            println!(
                "  {} {}  {}  {}",
                "bad".red().bold(),
                report.post_id,
                report.label,
                counts.dark_grey()
            );
            for violation in &report.violations {
                println!("      {}", violation.clone().red());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

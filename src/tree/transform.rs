//! Post → tree transform.
//!
//! Pure function from one `Post` to a rooted `TreeNode`. The export carries a
//! flat comment list with raw `depth`/`parent_id` fields; both are re-derived
//! here so the tree invariant (child depth = parent depth + 1) holds no matter
//! what the source recorded. Normalizations:
//!
//! - depth-0 comments become children of the post root, regardless of their
//!   recorded parent pointer (the source encodes these inconsistently)
//! - a `parent_id` that is absent from the list, equal to the post id, or
//!   self-referential resolves to the root
//! - comments unreachable through parent links (cyclic references) fall back
//!   onto the root, so every comment is placed exactly once

use std::collections::{HashMap, HashSet};

use crate::data::model::{Comment, Post};
use crate::tree::model::TreeNode;

/// Build the discussion tree for one post.
pub fn build_tree(post: &Post) -> TreeNode {
    let ids: HashSet<&str> = post.comments.iter().map(|c| c.id.as_str()).collect();

    let mut children_of: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut root_children: Vec<usize> = Vec::new();
    for (idx, comment) in post.comments.iter().enumerate() {
        match effective_parent(comment, &post.post_id, &ids) {
            Some(parent) => children_of.entry(parent).or_default().push(idx),
            None => root_children.push(idx),
        }
    }

    let mut visited = vec![false; post.comments.len()];
    let mut children = Vec::new();
    for idx in root_children {
        children.push(build_node(idx, 1, &post.post_id, post, &children_of, &mut visited));
    }
    for idx in 0..post.comments.len() {
        if !visited[idx] {
            children.push(build_node(idx, 1, &post.post_id, post, &children_of, &mut visited));
        }
    }

    TreeNode {
        id: post.post_id.clone(),
        depth: 0,
        parent_id: None,
        author: post.author_or_deleted().to_string(),
        text: post.content_or_empty().to_string(),
        more_replies: false,
        children,
    }
}

/// The comment id this comment nests under, or `None` for the post root.
fn effective_parent<'a>(
    comment: &'a Comment,
    post_id: &str,
    ids: &HashSet<&'a str>,
) -> Option<&'a str> {
    if comment.depth == 0 {
        return None;
    }
    match comment.parent_id.as_deref() {
        Some(p) if p != post_id && p != comment.id && ids.contains(p) => Some(p),
        _ => None,
    }
}

fn build_node(
    idx: usize,
    depth: u32,
    parent_id: &str,
    post: &Post,
    children_of: &HashMap<&str, Vec<usize>>,
    visited: &mut Vec<bool>,
) -> TreeNode {
    visited[idx] = true;
    let comment = &post.comments[idx];

    let mut children = Vec::new();
    if let Some(child_indices) = children_of.get(comment.id.as_str()) {
        for &child_idx in child_indices {
            if !visited[child_idx] {
                children.push(build_node(
                    child_idx,
                    depth + 1,
                    &comment.id,
                    post,
                    children_of,
                    visited,
                ));
            }
        }
    }

    TreeNode {
        id: comment.id.clone(),
        depth,
        parent_id: Some(parent_id.to_string()),
        author: comment.author_or_deleted().to_string(),
        text: comment.text_or_empty().to_string(),
        more_replies: comment.more_replies.is_some(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, depth: u32, parent: Option<&str>) -> Comment {
        Comment {
            id: id.to_string(),
            author: Some(format!("author-{id}")),
            text: Some(format!("text-{id}")),
            depth,
            parent_id: parent.map(str::to_string),
            more_replies: None,
        }
    }

    fn post(comments: Vec<Comment>) -> Post {
        Post {
            post_id: "t3_post".to_string(),
            author: Some("op".to_string()),
            title: Some("title".to_string()),
            content: Some("content".to_string()),
            comments,
        }
    }

    fn depth_invariant(tree: &TreeNode) {
        for child in &tree.children {
            assert_eq!(child.depth, tree.depth + 1);
            assert_eq!(child.parent_id.as_deref(), Some(tree.id.as_str()));
            depth_invariant(child);
        }
    }

    #[test]
    fn node_count_is_one_plus_comments() {
        let p = post(vec![
            comment("a", 0, None),
            comment("b", 1, Some("a")),
            comment("c", 2, Some("b")),
            comment("d", 0, None),
        ]);
        let tree = build_tree(&p);
        assert_eq!(tree.count(), 1 + p.comments.len());
    }

    #[test]
    fn zero_comments_yields_single_root() {
        let p = post(vec![]);
        let tree = build_tree(&p);
        assert_eq!(tree.count(), 1);
        assert!(tree.is_leaf());
        assert_eq!(tree.depth, 0);
        assert!(tree.parent_id.is_none());
        assert_eq!(tree.chain("t3_post").unwrap().len(), 1);
    }

    #[test]
    fn replies_nest_under_their_parents() {
        let p = post(vec![
            comment("a", 0, None),
            comment("b", 1, Some("a")),
            comment("c", 2, Some("b")),
        ]);
        let tree = build_tree(&p);
        let ids: Vec<&str> = tree
            .chain("c")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t3_post", "a", "b", "c"]);
        depth_invariant(&tree);
    }

    #[test]
    fn depth_is_rederived_from_structure() {
        // Raw depth lies; linkage wins.
        let p = post(vec![comment("a", 0, None), comment("b", 7, Some("a"))]);
        let tree = build_tree(&p);
        assert_eq!(tree.find("b").unwrap().depth, 1);
        depth_invariant(&tree);
    }

    #[test]
    fn depth_zero_reparents_onto_post() {
        // The source sometimes records a bogus parent on top-level comments.
        let p = post(vec![comment("a", 0, Some("t1_elsewhere"))]);
        let tree = build_tree(&p);
        assert_eq!(
            tree.find("a").unwrap().parent_id.as_deref(),
            Some("t3_post")
        );
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn unknown_parent_attaches_to_root() {
        let p = post(vec![comment("a", 3, Some("t1_missing"))]);
        let tree = build_tree(&p);
        assert_eq!(tree.find("a").unwrap().depth, 1);
        assert_eq!(tree.count(), 2);
    }

    #[test]
    fn parent_equal_to_post_id_attaches_to_root() {
        let p = post(vec![comment("a", 1, Some("t3_post"))]);
        let tree = build_tree(&p);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.find("a").unwrap().depth, 1);
    }

    #[test]
    fn cyclic_parents_do_not_hang_and_place_every_comment() {
        let p = post(vec![comment("a", 1, Some("b")), comment("b", 1, Some("a"))]);
        let tree = build_tree(&p);
        assert_eq!(tree.count(), 3);
        depth_invariant(&tree);
    }

    #[test]
    fn root_carries_post_fields() {
        let p = post(vec![]);
        let tree = build_tree(&p);
        assert_eq!(tree.id, "t3_post");
        assert_eq!(tree.author, "op");
        assert_eq!(tree.text, "content");
    }

    #[test]
    fn sibling_order_follows_input_order() {
        let p = post(vec![
            comment("z", 0, None),
            comment("m", 0, None),
            comment("a", 0, None),
        ]);
        let tree = build_tree(&p);
        let ids: Vec<&str> = tree.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
    }
}

//! Geometry for the tree diagram.
//!
//! `compute` turns a discussion tree into screen placements: breadth
//! coordinates from the tidy solver, depth ranks spread across the working
//! area, and one link per parent/child edge. Orientation decides which screen
//! axis carries depth. Links carry a weight that thins with depth; rendering
//! decides how to draw it.

pub mod tidy;

use crate::tree::model::TreeNode;
use tidy::TidyConfig;

/// Fraction of the working area given to the depth axis, per orientation.
/// Breadth always uses the full cross axis.
const HORIZONTAL_DEPTH_FRACTION: f64 = 0.8;
const VERTICAL_DEPTH_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Depth grows rightward, breadth is vertical.
    Horizontal,
    /// Depth grows downward, breadth is horizontal.
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Stroke weight for a link by its target node's depth: thick near the root,
/// thinning by half a unit per level, floored so links never vanish.
pub fn link_weight(target_depth: u32) -> f64 {
    (4.0 - 0.5 * f64::from(target_depth)).max(1.5)
}

/// A node with its computed screen position (working-area units).
#[derive(Debug, Clone)]
pub struct PlacedNode {
    pub id: String,
    pub depth: u32,
    pub author: String,
    pub is_leaf: bool,
    pub x: f64,
    pub y: f64,
}

impl PlacedNode {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// A parent→child edge. Endpoint positions are resolved at draw time from the
/// (possibly mid-transition) node positions.
#[derive(Debug, Clone)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub links: Vec<Link>,
}

/// Lay the tree out inside `area` (width, height) for the given orientation.
pub fn compute(
    tree: &TreeNode,
    orientation: Orientation,
    area: (f64, f64),
    config: &TidyConfig,
) -> Layout {
    let placements = tidy::layout_breadth(tree, config);

    let (width, height) = area;
    let (breadth_extent, depth_extent) = match orientation {
        Orientation::Horizontal => (height, width * HORIZONTAL_DEPTH_FRACTION),
        Orientation::Vertical => (width, height * VERTICAL_DEPTH_FRACTION),
    };

    let max_breadth = placements.iter().map(|p| p.x).fold(0.0, f64::max);
    let max_depth = placements.iter().map(|p| p.depth).max().unwrap_or(0);

    let nodes = placements
        .iter()
        .map(|p| {
            let breadth = if max_breadth > 0.0 {
                p.x / max_breadth * breadth_extent
            } else {
                breadth_extent / 2.0
            };
            let depth_pos = if max_depth > 0 {
                f64::from(p.depth) / f64::from(max_depth) * depth_extent
            } else {
                0.0
            };
            let (x, y) = match orientation {
                Orientation::Horizontal => (depth_pos, breadth),
                Orientation::Vertical => (breadth, depth_pos),
            };
            PlacedNode {
                id: p.node.id.clone(),
                depth: p.depth,
                author: p.node.author.clone(),
                is_leaf: p.node.is_leaf(),
                x,
                y,
            }
        })
        .collect();

    let mut links = Vec::new();
    collect_links(tree, &mut links);

    Layout { nodes, links }
}

fn collect_links(node: &TreeNode, links: &mut Vec<Link>) {
    for child in &node.children {
        links.push(Link {
            source: node.id.clone(),
            target: child.id.clone(),
            weight: link_weight(child.depth),
        });
        collect_links(child, links);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn node(id: &str, depth: u32, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            id: id.to_string(),
            depth,
            parent_id: None,
            author: format!("author-{id}"),
            text: String::new(),
            more_replies: false,
            children,
        }
    }

    fn sample() -> TreeNode {
        node(
            "root",
            0,
            vec![
                node("a", 1, vec![node("a1", 2, vec![])]),
                node("b", 1, vec![]),
            ],
        )
    }

    fn by_id(layout: &Layout) -> HashMap<&str, &PlacedNode> {
        layout.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    const AREA: (f64, f64) = (120.0, 40.0);

    #[test]
    fn horizontal_maps_depth_to_x() {
        let tree = sample();
        let layout = compute(&tree, Orientation::Horizontal, AREA, &TidyConfig::default());
        let pos = by_id(&layout);
        assert!(pos["a"].x > pos["root"].x);
        assert!(pos["a1"].x > pos["a"].x);
        // Siblings spread on y.
        assert!((pos["a"].x - pos["b"].x).abs() < 1e-9);
        assert!(pos["a"].y != pos["b"].y);
    }

    #[test]
    fn vertical_maps_depth_to_y() {
        let tree = sample();
        let layout = compute(&tree, Orientation::Vertical, AREA, &TidyConfig::default());
        let pos = by_id(&layout);
        assert!(pos["a"].y > pos["root"].y);
        assert!(pos["a1"].y > pos["a"].y);
        assert!((pos["a"].y - pos["b"].y).abs() < 1e-9);
        assert!(pos["a"].x != pos["b"].x);
    }

    #[test]
    fn toggling_orientation_twice_restores_geometry() {
        let tree = sample();
        let config = TidyConfig::default();
        let before = compute(&tree, Orientation::Horizontal, AREA, &config);
        let flipped = Orientation::Horizontal.flipped().flipped();
        let after = compute(&tree, flipped, AREA, &config);
        for (b, a) in before.nodes.iter().zip(after.nodes.iter()) {
            assert_eq!(b.id, a.id);
            assert_eq!(b.x, a.x);
            assert_eq!(b.y, a.y);
        }
    }

    #[test]
    fn sibling_order_is_preserved_across_orientations() {
        let tree = node(
            "root",
            0,
            vec![node("a", 1, vec![]), node("b", 1, vec![]), node("c", 1, vec![])],
        );
        let horizontal = compute(&tree, Orientation::Horizontal, AREA, &TidyConfig::default());
        let vertical = compute(&tree, Orientation::Vertical, AREA, &TidyConfig::default());
        let h = by_id(&horizontal);
        let v = by_id(&vertical);
        // Breadth axis is y when horizontal, x when vertical; order matches.
        assert!(h["a"].y < h["b"].y && h["b"].y < h["c"].y);
        assert!(v["a"].x < v["b"].x && v["b"].x < v["c"].x);
    }

    #[test]
    fn single_root_sits_centered_with_no_links() {
        let tree = node("root", 0, vec![]);
        let layout = compute(&tree, Orientation::Horizontal, AREA, &TidyConfig::default());
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.links.is_empty());
        let root = &layout.nodes[0];
        assert_eq!(root.x, 0.0);
        assert!((root.y - AREA.1 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn one_link_per_parent_child_edge() {
        let tree = sample();
        let layout = compute(&tree, Orientation::Horizontal, AREA, &TidyConfig::default());
        assert_eq!(layout.links.len(), layout.nodes.len() - 1);
        assert!(
            layout
                .links
                .iter()
                .any(|l| l.source == "a" && l.target == "a1")
        );
    }

    #[test]
    fn link_weight_thins_with_depth_to_a_floor() {
        assert!((link_weight(1) - 3.5).abs() < 1e-9);
        assert!((link_weight(2) - 3.0).abs() < 1e-9);
        assert!((link_weight(5) - 1.5).abs() < 1e-9);
        assert!((link_weight(40) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn link_weights_come_from_target_depth() {
        let tree = sample();
        let layout = compute(&tree, Orientation::Horizontal, AREA, &TidyConfig::default());
        let link = layout
            .links
            .iter()
            .find(|l| l.target == "a1")
            .expect("link to a1");
        assert!((link.weight - link_weight(2)).abs() < 1e-9);
    }
}

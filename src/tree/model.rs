/// A node in the discussion tree: the post at the root, one node per comment
/// below it.
///
/// Invariant: `depth` equals the edge count from the root, so every child's
/// depth is its parent's depth + 1. The transform derives depth from the
/// nesting structure, never from the raw export field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Stable identifier from the source (post id for the root, comment id
    /// otherwise). Used to match nodes across re-layouts.
    pub id: String,
    pub depth: u32,
    /// `None` only for the root.
    pub parent_id: Option<String>,
    pub author: String,
    pub text: String,
    /// The source elided further replies below this node.
    pub more_replies: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count of this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// The ancestor chain from this root down to the node with `id`,
    /// inclusive of both ends. `None` when the id is not in the subtree.
    pub fn chain(&self, id: &str) -> Option<Vec<&TreeNode>> {
        if self.id == id {
            return Some(vec![self]);
        }
        for child in &self.children {
            if let Some(mut path) = child.chain(id) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// Visit every node in depth-first order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

use crate::tree::{NodeId, Tree};

/// Depth -> nodes lookup for one tree, in the tree's visiting order.
#[derive(Debug, Clone)]
pub struct LevelIndex<'t> {
    tree: &'t Tree,
    levels: Vec<Vec<NodeId>>,
}

impl<'t> LevelIndex<'t> {
    pub fn build(tree: &'t Tree) -> Self {
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        for (id, node) in tree.iter() {
            if levels.len() <= node.depth {
                levels.resize_with(node.depth + 1, Vec::new);
            }
            levels[node.depth].push(id);
        }
        Self { tree, levels }
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct depths present.
    pub fn depth_count(&self) -> usize {
        self.levels.len()
    }

    pub fn nodes_at(&self, depth: usize) -> &[NodeId] {
        self.levels.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names_at(&self, depth: usize) -> impl Iterator<Item = &'t str> + '_ {
        let tree = self.tree;
        self.nodes_at(depth).iter().map(move |id| tree.name(*id))
    }

    /// True when any node at `depth` is named `name`. Duplicate names are not distinguished.
    pub fn contains_name(&self, depth: usize, name: &str) -> bool {
        self.names_at(depth).any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[NodeId])> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(depth, ids)| (depth, ids.as_slice()))
    }
}

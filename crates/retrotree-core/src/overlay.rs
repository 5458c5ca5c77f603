use crate::tree::{NodeId, Tree};
use rustc_hash::FxHashMap;

/// `"{depth}-{name}-{parent name}"`, or `"{depth}-{name}-root"` for the root.
pub fn alignment_key(tree: &Tree, id: NodeId) -> String {
    let node = tree.node(id);
    match node.parent {
        Some(parent) => format!("{}-{}-{}", node.depth, node.name, tree.name(parent)),
        None => format!("{}-{}-root", node.depth, node.name),
    }
}

/// Correspondence between an overlay tree and the main tree it is drawn over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayAlignment {
    /// `(overlay node, main node)` pairs in overlay visiting order.
    pub matched: Vec<(NodeId, NodeId)>,
    pub unmatched: Vec<NodeId>,
}

/// Aligns every overlay node to the main-tree node with the same key. When several main nodes
/// share a key the last one visited wins.
pub fn align_overlay(main: &Tree, overlay: &Tree) -> OverlayAlignment {
    let mut by_key: FxHashMap<String, NodeId> = FxHashMap::default();
    for id in main.ids() {
        by_key.insert(alignment_key(main, id), id);
    }

    let mut out = OverlayAlignment::default();
    for id in overlay.ids() {
        let key = alignment_key(overlay, id);
        match by_key.get(&key) {
            Some(main_id) => out.matched.push((id, *main_id)),
            None => {
                tracing::debug!(key = %key, "overlay node has no main-tree counterpart");
                out.unmatched.push(id);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aligns_by_depth_name_and_parent_name() {
        let main = Tree::from_value(&json!({
            "name": "r",
            "children": [
                { "name": "a", "children": [{ "name": "x" }] },
                { "name": "b", "children": [{ "name": "x" }] }
            ]
        }))
        .unwrap();
        let overlay = Tree::from_value(&json!({
            "name": "r",
            "children": [
                { "name": "b", "children": [{ "name": "x" }, { "name": "q" }] },
                { "name": "x" }
            ]
        }))
        .unwrap();

        let alignment = align_overlay(&main, &overlay);
        let matched: Vec<(&str, NodeId)> = alignment
            .matched
            .iter()
            .map(|(o, m)| (overlay.name(*o), *m))
            .collect();
        // r -> r, b -> b, x under b -> main x under b (id 4)
        assert_eq!(
            matched,
            vec![
                ("r", NodeId::ROOT),
                ("b", NodeId::from_index(2)),
                ("x", NodeId::from_index(4))
            ]
        );
        let unmatched: Vec<&str> = alignment.unmatched.iter().map(|id| overlay.name(*id)).collect();
        assert_eq!(unmatched, vec!["x", "q"]);
    }

    #[test]
    fn root_key_uses_root_marker() {
        let tree = Tree::from_value(&json!({ "name": "t" })).unwrap();
        assert_eq!(alignment_key(&tree, NodeId::ROOT), "0-t-root");
    }
}

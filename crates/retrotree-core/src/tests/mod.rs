mod matcher;

use crate::Tree;
use serde_json::{Value, json};

pub(super) fn tree(value: Value) -> Tree {
    Tree::from_value(&value).unwrap()
}

/// Deterministic bushy tree with repeated names at several depths.
pub(super) fn bushy(depth: usize, fanout: usize) -> Value {
    fn node(prefix: &str, level: usize, depth: usize, fanout: usize) -> Value {
        if level == depth {
            return json!({ "name": prefix, "is_leaf": true });
        }
        let children: Vec<Value> = (0..fanout)
            .map(|i| {
                // Names repeat across siblings' subtrees on purpose.
                let name = format!("n{}", (level + i) % 3);
                node(&name, level + 1, depth, fanout)
            })
            .collect();
        json!({ "name": prefix, "children": children })
    }
    node("root", 0, depth, fanout)
}

//! Arena-backed tree model built from `{ name, is_leaf, children }` JSON nodes.
//!
//! Nodes are allocated in breadth-first order, so `NodeId` order is the hierarchy's visiting
//! order and every parent id is smaller than the ids of its children.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub is_leaf: bool,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuildOptions {
    /// Sort every child list by name (ascending) before ids are assigned.
    pub sort_children_by_name: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with(value, TreeBuildOptions::default())
    }

    pub fn from_value_with(value: &Value, options: TreeBuildOptions) -> Result<Self> {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut queue: VecDeque<(&Value, Option<NodeId>, usize, String)> = VecDeque::new();
        queue.push_back((value, None, 0, "$".to_string()));

        while let Some((raw, parent, depth, path)) = queue.pop_front() {
            let obj = raw.as_object().ok_or_else(|| Error::InvalidNode {
                path: path.clone(),
                message: "expected an object".to_string(),
            })?;
            let name = node_name(obj, &path)?.to_string();
            let is_leaf = match obj.get("is_leaf") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => {
                    return Err(Error::InvalidNode {
                        path,
                        message: "`is_leaf` must be a boolean".to_string(),
                    });
                }
            };

            let id = NodeId(nodes.len());
            nodes.push(TreeNode {
                name,
                is_leaf,
                depth,
                parent,
                children: Vec::new(),
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }

            let children = match obj.get("children") {
                None | Some(Value::Null) => continue,
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(Error::InvalidNode {
                        path,
                        message: "`children` must be an array".to_string(),
                    });
                }
            };

            let mut ordered: Vec<(usize, &Value)> = children.iter().enumerate().collect();
            if options.sort_children_by_name {
                // Names are validated again when each child is dequeued; sorting only needs a key.
                ordered.sort_by(|(_, a), (_, b)| {
                    let ka = a.get("name").and_then(Value::as_str).unwrap_or_default();
                    let kb = b.get("name").and_then(Value::as_str).unwrap_or_default();
                    ka.cmp(kb)
                });
            }
            for (i, child) in ordered {
                queue.push_back((child, Some(id), depth + 1, format!("{path}.children[{i}]")));
            }
        }

        tracing::trace!(nodes = nodes.len(), "tree built");
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId::ROOT)
        }
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Node ids in breadth-first order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Parent -> child links in breadth-first order of the child.
    pub fn links(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.iter()
            .filter_map(|(id, n)| n.parent.map(|parent| (parent, id)))
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    /// Ids on the path from the root down to `id` (inclusive).
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            out.push(p);
            cur = p;
        }
        out.reverse();
        out
    }

    pub fn to_value(&self) -> Value {
        match self.root() {
            Some(root) => self.node_to_value(root),
            None => Value::Null,
        }
    }

    fn node_to_value(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let mut obj = Map::new();
        obj.insert("name".to_string(), Value::String(node.name.clone()));
        obj.insert("is_leaf".to_string(), Value::Bool(node.is_leaf));
        if node.has_children() {
            obj.insert(
                "children".to_string(),
                Value::Array(
                    node.children
                        .iter()
                        .map(|c| self.node_to_value(*c))
                        .collect(),
                ),
            );
        }
        Value::Object(obj)
    }
}

fn node_name<'a>(obj: &'a Map<String, Value>, path: &str) -> Result<&'a str> {
    match obj.get("name") {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(Error::InvalidNode {
            path: path.to_string(),
            message: "`name` must be a string".to_string(),
        }),
        None => Err(Error::InvalidNode {
            path: path.to_string(),
            message: "missing `name`".to_string(),
        }),
    }
}

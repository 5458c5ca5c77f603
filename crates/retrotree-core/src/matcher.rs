//! Name/depth path matcher.
//!
//! Every marker walks the reference tree breadth-first. A non-root node is only considered when
//! its parent already carries one of the marker's own tags, so the tagged nodes of a single pass
//! always hang together from the root. A node matches when some node of the secondary tree at the
//! same depth has the same name; the secondary tree's structure is otherwise ignored.

use crate::level_index::LevelIndex;
use crate::tree::{NodeId, Tree};
use serde::Serialize;
use std::collections::VecDeque;

/// Side-table of per-node tags for one reference tree, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagMap<T> {
    tags: Vec<T>,
}

impl<T: Copy + Default> TagMap<T> {
    pub fn new(tree: &Tree) -> Self {
        Self {
            tags: vec![T::default(); tree.len()],
        }
    }

    pub fn get(&self, id: NodeId) -> T {
        self.tags.get(id.index()).copied().unwrap_or_default()
    }

    pub fn set(&mut self, id: NodeId, tag: T) {
        let i = id.index();
        if i >= self.tags.len() {
            self.tags.resize(i + 1, T::default());
        }
        self.tags[i] = tag;
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.tags
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, T)> + '_ {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, t)| (NodeId::from_index(i), *t))
    }

    fn fit(&mut self, tree: &Tree) {
        if self.tags.len() < tree.len() {
            self.tags.resize(tree.len(), T::default());
        }
    }
}

impl<T: Copy + Default + PartialEq> TagMap<T> {
    /// Ids whose tag differs from `T::default()`.
    pub fn tagged(&self) -> Vec<NodeId> {
        let none = T::default();
        self.iter()
            .filter(|(_, t)| *t != none)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count(&self, tag: T) -> usize {
        self.tags.iter().filter(|t| **t == tag).count()
    }
}

/// Tag values for [`mark_alternating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlternatingTags<T> {
    /// Written on matches that do not currently hold `superior_value`.
    pub value: T,
    /// Written on the root and on matches that currently hold `superior_value`.
    pub neg_value: T,
    /// Pivot tag left by an earlier pass.
    pub superior_value: T,
}

/// Visits every non-root node breadth-first as `(node, parent)`.
fn walk_breadth_first(tree: &Tree, mut visit: impl FnMut(NodeId, NodeId)) {
    let Some(root) = tree.root() else {
        return;
    };
    let mut queue: VecDeque<NodeId> = VecDeque::with_capacity(tree.len());
    queue.push_back(root);
    while let Some(id) = queue.pop_front() {
        if let Some(parent) = tree.parent(id) {
            visit(id, parent);
        }
        queue.extend(tree.children(id).iter().copied());
    }
}

fn matches_level(reference: &Tree, id: NodeId, secondary: &LevelIndex<'_>) -> bool {
    let node = reference.node(id);
    secondary.contains_name(node.depth, &node.name)
}

/// Boolean marker: root is `true`; a node becomes `true` when its parent is `true` and its name
/// appears at the same depth of the secondary tree.
pub fn mark_simple(reference: &Tree, secondary: &LevelIndex<'_>) -> TagMap<bool> {
    let mut tags = TagMap::new(reference);
    let Some(root) = reference.root() else {
        return tags;
    };
    tags.set(root, true);

    walk_breadth_first(reference, |id, parent| {
        if tags.get(parent) && matches_level(reference, id, secondary) {
            tags.set(id, true);
        }
    });

    tracing::debug!(marked = tags.count(true), nodes = reference.len(), "simple path marked");
    tags
}

/// Single-value marker. The root is overwritten with `value` whatever it held before, and so is
/// every overlap with earlier passes; apply higher-priority paths last.
pub fn mark_tagged<T>(reference: &Tree, secondary: &LevelIndex<'_>, tags: &mut TagMap<T>, value: T)
where
    T: Copy + Default + PartialEq,
{
    let Some(root) = reference.root() else {
        return;
    };
    tags.fit(reference);
    tags.set(root, value);

    walk_breadth_first(reference, |id, parent| {
        if tags.get(parent) == value && matches_level(reference, id, secondary) {
            tags.set(id, value);
        }
    });

    tracing::debug!(marked = tags.count(value), nodes = reference.len(), "tagged path marked");
}

/// Two-value marker. The root becomes `neg_value`. A node whose parent holds `value` or
/// `neg_value` and whose name matches at its depth becomes `neg_value` if it currently holds
/// `superior_value`, otherwise `value`. Equal parameter values are accepted as given.
pub fn mark_alternating<T>(
    reference: &Tree,
    secondary: &LevelIndex<'_>,
    tags: &mut TagMap<T>,
    alt: AlternatingTags<T>,
) where
    T: Copy + Default + PartialEq,
{
    let Some(root) = reference.root() else {
        return;
    };
    tags.fit(reference);
    tags.set(root, alt.neg_value);

    walk_breadth_first(reference, |id, parent| {
        let parent_tag = tags.get(parent);
        if parent_tag != alt.value && parent_tag != alt.neg_value {
            return;
        }
        if !matches_level(reference, id, secondary) {
            return;
        }
        if tags.get(id) == alt.superior_value {
            tags.set(id, alt.neg_value);
        } else {
            tags.set(id, alt.value);
        }
    });

    tracing::debug!(
        forward = tags.count(alt.value),
        back = tags.count(alt.neg_value),
        nodes = reference.len(),
        "alternating path marked"
    );
}

/// Tag of each parent -> child link: the child's tag.
pub fn link_tags<T: Copy + Default>(tree: &Tree, tags: &TagMap<T>) -> Vec<(NodeId, NodeId, T)> {
    tree.links()
        .map(|(parent, child)| (parent, child, tags.get(child)))
        .collect()
}

/// Tag of each link when both ends agree, `T::default()` otherwise.
pub fn uniform_link_tags<T>(tree: &Tree, tags: &TagMap<T>) -> Vec<(NodeId, NodeId, T)>
where
    T: Copy + Default + PartialEq,
{
    tree.links()
        .map(|(parent, child)| {
            let (a, b) = (tags.get(parent), tags.get(child));
            (parent, child, if a == b { b } else { T::default() })
        })
        .collect()
}

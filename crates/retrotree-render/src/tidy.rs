//! Buchheim/Walker tidy tree (linear-time Reingold-Tilford).
//!
//! Positions are computed in "separation units" first and then stretched so the leftmost and
//! rightmost nodes sit half a separation away from `0` and `size_x`. Depths map linearly onto
//! `0..=size_y`. The result matches the classic hierarchy tree layout used by most web charting
//! libraries, so a radial projection of `(x, y)` as `(angle, radius)` lines up with them.

use retrotree_core::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidyPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
struct Work {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Sibling index.
    number: usize,
    ancestor: usize,
    default_ancestor: Option<usize>,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
}

struct Tidy<'a, F> {
    tree: &'a Tree,
    separation: F,
    work: Vec<Work>,
}

/// Lays `tree` out in a `size_x` by `size_y` box. `separation(a, b)` is the desired gap between
/// two horizontally adjacent nodes at the same depth, passed in either order.
pub fn tidy_layout<F>(tree: &Tree, size_x: f64, size_y: f64, separation: F) -> Vec<TidyPoint>
where
    F: Fn(NodeId, NodeId) -> f64,
{
    let n = tree.len();
    if n == 0 {
        return Vec::new();
    }

    let mut tidy = Tidy::new(tree, separation);

    for v in post_order(tree) {
        tidy.first_walk(v);
    }
    let virtual_root = n;
    tidy.work[virtual_root].modifier = -tidy.work[0].prelim;

    // Parents always precede their children in id order.
    let mut raw = vec![0.0_f64; n];
    for v in 0..n {
        let parent = tidy.work[v].parent.unwrap_or(virtual_root);
        let parent_mod = tidy.work[parent].modifier;
        raw[v] = tidy.work[v].prelim + parent_mod;
        tidy.work[v].modifier += parent_mod;
    }

    let order = pre_order(tree);
    let (mut left, mut right, mut bottom) = (0, 0, 0);
    for &v in &order {
        if raw[v] < raw[left] {
            left = v;
        }
        if raw[v] > raw[right] {
            right = v;
        }
        if tree.depth(NodeId::from_index(v)) > tree.depth(NodeId::from_index(bottom)) {
            bottom = v;
        }
    }

    let s = if left == right {
        1.0
    } else {
        (tidy.separation)(NodeId::from_index(left), NodeId::from_index(right)) / 2.0
    };
    let tx = s - raw[left];
    let kx = size_x / (raw[right] + s + tx);
    let bottom_depth = tree.depth(NodeId::from_index(bottom)).max(1) as f64;
    let ky = size_y / bottom_depth;

    (0..n)
        .map(|v| TidyPoint {
            x: (raw[v] + tx) * kx,
            y: tree.depth(NodeId::from_index(v)) as f64 * ky,
        })
        .collect()
}

/// Children before parents, siblings left to right.
fn post_order(tree: &Tree) -> Vec<usize> {
    let mut out = Vec::with_capacity(tree.len());
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        out.push(id.index());
        stack.extend(tree.children(id).iter().copied());
    }
    out.reverse();
    out
}

/// Parents before children, depth first, siblings left to right.
fn pre_order(tree: &Tree) -> Vec<usize> {
    let mut out = Vec::with_capacity(tree.len());
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        out.push(id.index());
        stack.extend(tree.children(id).iter().rev().copied());
    }
    out
}

impl<'a, F> Tidy<'a, F>
where
    F: Fn(NodeId, NodeId) -> f64,
{
    fn new(tree: &'a Tree, separation: F) -> Self {
        let n = tree.len();
        let mut work: Vec<Work> = tree
            .iter()
            .map(|(id, node)| Work {
                parent: node.parent.map(NodeId::index),
                children: node.children.iter().map(|c| c.index()).collect(),
                number: 0,
                ancestor: id.index(),
                default_ancestor: None,
                prelim: 0.0,
                modifier: 0.0,
                change: 0.0,
                shift: 0.0,
                thread: None,
            })
            .collect();
        for v in 0..n {
            for (i, c) in work[v].children.clone().into_iter().enumerate() {
                work[c].number = i;
            }
        }
        // Virtual parent of the root, so the root has a sibling list like every other node.
        work.push(Work {
            parent: None,
            children: vec![0],
            number: 0,
            ancestor: n,
            default_ancestor: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
        });
        work[0].parent = Some(n);
        Self {
            tree,
            separation,
            work,
        }
    }

    fn sep(&self, a: usize, b: usize) -> f64 {
        (self.separation)(NodeId::from_index(a), NodeId::from_index(b))
    }

    fn parent_of(&self, v: usize) -> usize {
        // Every real node has a parent once the virtual root is attached.
        self.work[v].parent.unwrap_or(self.tree.len())
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.work[v].children.first().copied().or(self.work[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.work[v].children.last().copied().or(self.work[v].thread)
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.parent_of(v);
        let number = self.work[v].number;
        let first_sibling = self.work[parent].children[0];
        let left_sibling = (number > 0).then(|| self.work[parent].children[number - 1]);

        if let (Some(&first), Some(&last)) =
            (self.work[v].children.first(), self.work[v].children.last())
        {
            self.execute_shifts(v);
            let midpoint = (self.work[first].prelim + self.work[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.work[v].prelim = self.work[w].prelim + self.sep(v, w);
                    self.work[v].modifier = self.work[v].prelim - midpoint;
                }
                None => self.work[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.work[v].prelim = self.work[w].prelim + self.sep(v, w);
        }

        let ancestor = self.work[parent].default_ancestor.unwrap_or(first_sibling);
        let ancestor = self.apportion(v, left_sibling, ancestor);
        self.work[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };

        let parent = self.parent_of(v);
        let mut vop = v;
        let mut vom = self.work[parent].children[0];
        let mut vip_cur = Some(v);
        let mut vim_cur = Some(w);
        let mut sip = self.work[v].modifier;
        let mut sop = self.work[v].modifier;
        let mut sim = self.work[w].modifier;
        let mut som = self.work[vom].modifier;

        loop {
            vim_cur = vim_cur.and_then(|n| self.next_right(n));
            vip_cur = vip_cur.and_then(|n| self.next_left(n));
            let (Some(vim), Some(vip)) = (vim_cur, vip_cur) else {
                break;
            };
            // The outer contours of the sibling group reach at least as deep as the inner ones.
            let (Some(next_vom), Some(next_vop)) = (self.next_left(vom), self.next_right(vop))
            else {
                break;
            };
            vom = next_vom;
            vop = next_vop;
            self.work[vop].ancestor = v;

            let shift =
                self.work[vim].prelim + sim - self.work[vip].prelim - sip + self.sep(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.work[vim].modifier;
            sip += self.work[vip].modifier;
            som += self.work[vom].modifier;
            sop += self.work[vop].modifier;
        }

        if let Some(vim) = vim_cur {
            if self.next_right(vop).is_none() {
                self.work[vop].thread = Some(vim);
                self.work[vop].modifier += sim - sop;
            }
        }
        if let Some(vip) = vip_cur {
            if self.next_left(vom).is_none() {
                self.work[vom].thread = Some(vip);
                self.work[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.work[vim].ancestor;
        if self.work[candidate].parent == self.work[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.work[wp].number as f64 - self.work[wm].number as f64;
        let change = shift / subtrees;
        self.work[wp].change -= change;
        self.work[wp].shift += shift;
        self.work[wm].change += change;
        self.work[wp].prelim += shift;
        self.work[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.work[v].children.len()).rev() {
            let w = self.work[v].children[i];
            self.work[w].prelim += shift;
            self.work[w].modifier += shift;
            change += self.work[w].change;
            shift += self.work[w].shift + change;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(_: NodeId, _: NodeId) -> f64 {
        1.0
    }

    #[test]
    fn single_node_sits_in_the_middle() {
        let tree = Tree::from_value(&json!({ "name": "r" })).unwrap();
        let points = tidy_layout(&tree, 10.0, 5.0, unit);
        assert_eq!(points, vec![TidyPoint { x: 5.0, y: 0.0 }]);
    }

    #[test]
    fn siblings_are_evenly_spaced_and_parent_centered() {
        let tree = Tree::from_value(&json!({
            "name": "r",
            "children": [{ "name": "a" }, { "name": "b" }, { "name": "c" }]
        }))
        .unwrap();
        let points = tidy_layout(&tree, 3.0, 1.0, unit);
        // Separation 1 between leaves, half a separation of padding on both ends.
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.5, 0.5, 1.5, 2.5]);
        assert!(points[1..].iter().all(|p| p.y == 1.0));
    }

    #[test]
    fn subtrees_do_not_overlap() {
        let tree = Tree::from_value(&json!({
            "name": "r",
            "children": [
                { "name": "a", "children": [{ "name": "a1" }, { "name": "a2" }, { "name": "a3" }] },
                { "name": "b" },
                { "name": "c", "children": [{ "name": "c1" }, { "name": "c2" }] }
            ]
        }))
        .unwrap();
        let points = tidy_layout(&tree, 100.0, 10.0, unit);

        for depth in 0..=tree.max_depth() {
            let mut xs: Vec<f64> = tree
                .ids()
                .filter(|id| tree.depth(*id) == depth)
                .map(|id| points[id.index()].x)
                .collect();
            let sorted = {
                let mut s = xs.clone();
                s.sort_by(f64::total_cmp);
                s
            };
            assert_eq!(xs, sorted, "order kept at depth {depth}");
            xs.dedup();
            assert_eq!(xs.len(), sorted.len(), "no collisions at depth {depth}");
        }

        // Parents are centered over their first and last child.
        for id in tree.ids() {
            let children = tree.children(id);
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                let mid = (points[first.index()].x + points[last.index()].x) / 2.0;
                assert!((points[id.index()].x - mid).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn extent_fills_the_requested_width() {
        let tree = Tree::from_value(&json!({
            "name": "r",
            "children": [
                { "name": "a", "children": [{ "name": "a1" }] },
                { "name": "b", "children": [{ "name": "b1" }, { "name": "b2" }] }
            ]
        }))
        .unwrap();
        let points = tidy_layout(&tree, 8.0, 4.0, unit);
        let min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        // Leftmost and rightmost nodes keep half a separation of padding (scaled).
        assert!((min - (8.0 - max)).abs() < 1e-9);
        assert!(min > 0.0);
        assert_eq!(points[3].y, 4.0);
    }

    #[test]
    fn wider_separation_spreads_cousins_further() {
        let tree = Tree::from_value(&json!({
            "name": "r",
            "children": [
                { "name": "a", "children": [{ "name": "a1" }, { "name": "a2" }] },
                { "name": "b", "children": [{ "name": "b1" }] }
            ]
        }))
        .unwrap();
        let narrow = tidy_layout(&tree, 10.0, 1.0, unit);
        let wide = tidy_layout(&tree, 10.0, 1.0, |a, b| {
            if tree.parent(a) == tree.parent(b) { 1.0 } else { 3.0 }
        });
        // Gap between the cousins a2 and b1 relative to the siblings a1 and a2.
        let ratio = |p: &[TidyPoint]| (p[5].x - p[4].x) / (p[4].x - p[3].x);
        assert!((ratio(&narrow) - 1.0).abs() < 1e-9);
        assert!(ratio(&wide) > 1.0);
    }
}

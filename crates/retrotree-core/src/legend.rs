//! Leaf numbering and the index table shown next to a diagram.

use crate::mode::{LeafRule, LegendLayout};
use crate::tree::{NodeId, Tree};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

/// Leaf name -> index (from 1) in first-seen order; repeated names share an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafLegend {
    indices: IndexMap<String, usize>,
    labels: Vec<Option<usize>>,
}

impl LeafLegend {
    pub fn build(tree: &Tree, rule: LeafRule) -> Self {
        let mut indices: IndexMap<String, usize> = IndexMap::new();
        let mut labels = vec![None; tree.len()];
        for (id, node) in tree.iter() {
            if !rule.is_leaf(node) {
                continue;
            }
            let next = indices.len() + 1;
            let idx = *indices.entry(node.name.clone()).or_insert(next);
            labels[id.index()] = Some(idx);
        }
        Self { indices, labels }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index drawn next to `id`, if it is a leaf.
    pub fn label(&self, id: NodeId) -> Option<usize> {
        self.labels.get(id.index()).copied().flatten()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// `(index, name)` sorted by index.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.indices.iter().map(|(name, idx)| (*idx, name.as_str()))
    }

    pub fn table(&self, layout: LegendLayout) -> LegendTable {
        let rows = match layout {
            LegendLayout::IndexNameRows => self
                .entries()
                .map(|(idx, name)| vec![idx.to_string(), name.to_string()])
                .collect(),
            LegendLayout::Grid { columns } => {
                let columns = columns.max(1);
                let cells: Vec<String> = self
                    .entries()
                    .map(|(idx, name)| format!("{idx}: {name}"))
                    .collect();
                cells.chunks(columns).map(<[String]>::to_vec).collect()
            }
        };
        LegendTable { rows }
    }
}

/// Visible legend cell text, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegendTable {
    pub rows: Vec<Vec<String>>,
}

impl LegendTable {
    pub fn cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// `{"data": [...]}` built from the visible cell text: text after the first `:` when the cell
    /// has one, the whole trimmed text otherwise.
    pub fn export_json(&self) -> Value {
        let data: Vec<String> = self.cells().map(cell_substance).collect();
        json!({ "data": data })
    }
}

pub fn cell_substance(cell: &str) -> String {
    let text = cell.trim();
    match text.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Tree {
        Tree::from_value(&json!({
            "name": "target",
            "children": [
                { "name": "b", "is_leaf": true },
                { "name": "m", "children": [
                    { "name": "a", "is_leaf": true },
                    { "name": "b", "is_leaf": true },
                    { "name": "c:1", "is_leaf": true }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn repeated_leaf_names_share_an_index() {
        let tree = tree();
        let legend = LeafLegend::build(&tree, LeafRule::Flag);
        assert_eq!(legend.len(), 3);
        assert_eq!(legend.index_of("b"), Some(1));
        assert_eq!(legend.index_of("a"), Some(2));
        let labels: Vec<Option<usize>> = tree.ids().map(|id| legend.label(id)).collect();
        assert_eq!(labels, vec![None, Some(1), None, Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn grid_keeps_trailing_partial_row() {
        let legend = LeafLegend::build(&tree(), LeafRule::Flag);
        let table = legend.table(LegendLayout::Grid { columns: 2 });
        assert_eq!(
            table.rows,
            vec![
                vec!["1: b".to_string(), "2: a".to_string()],
                vec!["3: c:1".to_string()]
            ]
        );
    }

    #[test]
    fn export_keeps_everything_after_first_colon() {
        let legend = LeafLegend::build(&tree(), LeafRule::Flag);
        let table = legend.table(LegendLayout::Grid { columns: 3 });
        assert_eq!(table.export_json(), json!({ "data": ["b", "a", "c:1"] }));
    }

    #[test]
    fn index_name_rows_split_name_cells_on_colon() {
        let legend = LeafLegend::build(&tree(), LeafRule::Flag);
        let table = legend.table(LegendLayout::IndexNameRows);
        assert_eq!(table.rows[0], vec!["1".to_string(), "b".to_string()]);
        assert_eq!(
            table.export_json(),
            json!({ "data": ["1", "b", "2", "a", "3", "1"] })
        );
    }

    #[test]
    fn no_children_rule_numbers_childless_nodes() {
        let tree = Tree::from_value(&json!({ "name": "r", "children": [{ "name": "x" }] })).unwrap();
        let legend = LeafLegend::build(&tree, LeafRule::NoChildren);
        assert_eq!(legend.entries().collect::<Vec<_>>(), vec![(1, "x")]);
        assert!(LeafLegend::build(&tree, LeafRule::Flag).is_empty());
    }
}

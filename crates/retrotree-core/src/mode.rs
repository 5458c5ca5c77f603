//! Render modes: which trees a payload carries, how they are tagged, and how tags map to display
//! classes.

use crate::tree::{NodeId, Tree, TreeNode};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path membership of a reference-tree node after all passes of a mode have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathTag {
    #[default]
    None,
    SonTree,
    Path1Forward,
    Path1Back,
    Path2Forward,
    Path2Back,
}

impl PathTag {
    pub fn as_str(self) -> &'static str {
        match self {
            PathTag::None => "none",
            PathTag::SonTree => "son_tree",
            PathTag::Path1Forward => "path1_forward",
            PathTag::Path1Back => "path1_back",
            PathTag::Path2Forward => "path2_forward",
            PathTag::Path2Back => "path2_back",
        }
    }
}

/// How a mode decides that a node is a leaf, for fill color or legend numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafRule {
    /// The payload's `is_leaf` flag.
    Flag,
    /// The node has no children.
    NoChildren,
}

impl LeafRule {
    pub fn is_leaf(self, node: &TreeNode) -> bool {
        match self {
            LeafRule::Flag => node.is_leaf,
            LeafRule::NoChildren => !node.has_children(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Leaf,
    Root,
    Inner,
}

/// Legend table shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLayout {
    /// One row per entry: an index cell followed by a name cell.
    IndexNameRows,
    /// `"{index}: {name}"` cells, `columns` per row.
    Grid { columns: usize },
}

/// Presentation constants of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeStyle {
    pub sort_children_by_name: bool,
    /// Separation numerator for neighbours that do not share a parent.
    pub cousin_separation: f64,
    /// Vertical position of the root as a fraction of the canvas height.
    pub center_y_ratio: f64,
    pub node_radius: f64,
    pub label_font_size: f64,
    pub label_font_family: Option<&'static str>,
    /// Leaf test for the node fill.
    pub fill_leaf_rule: LeafRule,
    /// Leaf test for legend numbering.
    pub legend_leaf_rule: LeafRule,
    pub legend: LegendLayout,
}

impl ModeStyle {
    /// Tidy-tree separation between two horizontally adjacent nodes.
    pub fn separation(&self, same_parent: bool, depth: usize) -> f64 {
        let base = if same_parent {
            1.0
        } else {
            self.cousin_separation
        };
        base / depth.max(1) as f64
    }

    pub fn node_kind(&self, tree: &Tree, id: NodeId) -> NodeKind {
        let node = tree.node(id);
        if self.fill_leaf_rule.is_leaf(node) {
            return NodeKind::Leaf;
        }
        let is_root_name = tree.root_node().is_some_and(|root| root.name == node.name);
        if is_root_name {
            NodeKind::Root
        } else {
            NodeKind::Inner
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Single,
    Double,
    Three,
    Quad,
    Five,
}

impl RenderMode {
    pub const ALL: [RenderMode; 5] = [
        RenderMode::Single,
        RenderMode::Double,
        RenderMode::Three,
        RenderMode::Quad,
        RenderMode::Five,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Single => "single",
            RenderMode::Double => "double",
            RenderMode::Three => "three",
            RenderMode::Quad => "quad",
            RenderMode::Five => "five",
        }
    }

    /// Payload keys of the trees this mode reads, reference tree first. `single` reads the
    /// document itself.
    pub fn tree_keys(self) -> &'static [&'static str] {
        match self {
            RenderMode::Single => &[],
            RenderMode::Double => &["bigTree", "smallTree"],
            RenderMode::Three => &["main", "son", "path1"],
            RenderMode::Quad => &["main", "son", "path1", "path2"],
            RenderMode::Five => &["main", "son", "path1", "path2", "black_tree"],
        }
    }

    pub fn style(self) -> ModeStyle {
        match self {
            RenderMode::Single => ModeStyle {
                sort_children_by_name: true,
                cousin_separation: 1.5,
                center_y_ratio: 0.59,
                node_radius: 3.0,
                label_font_size: 8.0,
                label_font_family: None,
                fill_leaf_rule: LeafRule::Flag,
                legend_leaf_rule: LeafRule::NoChildren,
                legend: LegendLayout::IndexNameRows,
            },
            RenderMode::Double => ModeStyle {
                sort_children_by_name: false,
                cousin_separation: 1.0,
                center_y_ratio: 0.5,
                node_radius: 3.0,
                label_font_size: 10.0,
                label_font_family: None,
                fill_leaf_rule: LeafRule::NoChildren,
                legend_leaf_rule: LeafRule::NoChildren,
                legend: LegendLayout::Grid { columns: 3 },
            },
            RenderMode::Three | RenderMode::Quad => ModeStyle {
                sort_children_by_name: false,
                cousin_separation: 1.0,
                center_y_ratio: 0.5,
                node_radius: 3.0,
                label_font_size: 8.0,
                label_font_family: Some("Arial, sans-serif"),
                fill_leaf_rule: LeafRule::Flag,
                legend_leaf_rule: LeafRule::Flag,
                legend: LegendLayout::Grid { columns: 3 },
            },
            RenderMode::Five => ModeStyle {
                sort_children_by_name: false,
                cousin_separation: 1.0,
                center_y_ratio: 0.5,
                node_radius: 4.0,
                label_font_size: 10.0,
                label_font_family: None,
                fill_leaf_rule: LeafRule::NoChildren,
                legend_leaf_rule: LeafRule::NoChildren,
                legend: LegendLayout::Grid { columns: 3 },
            },
        }
    }

    /// CSS class of a reference-tree node. `None` means the mode draws unclassed nodes.
    pub fn node_class(self, tag: PathTag) -> Option<&'static str> {
        let class = match self {
            RenderMode::Single => return None,
            RenderMode::Double => match tag {
                PathTag::None => "normal",
                _ => "highlight",
            },
            RenderMode::Three | RenderMode::Quad => match tag {
                PathTag::None => "normal",
                PathTag::SonTree => "highlight",
                PathTag::Path1Forward => "path1_normal",
                PathTag::Path1Back => "path1_highlight",
                PathTag::Path2Forward if self == RenderMode::Quad => "path2_normal",
                PathTag::Path2Back if self == RenderMode::Quad => "path2_highlight",
                PathTag::Path2Forward | PathTag::Path2Back => "normal",
            },
            RenderMode::Five => match tag {
                PathTag::None => "normal",
                PathTag::SonTree => "highlight",
                PathTag::Path1Forward => "path1",
                _ => "path2",
            },
        };
        Some(class)
    }

    /// CSS class of a link, derived from the tag of the link's child node.
    pub fn link_class(self, child_tag: PathTag) -> Option<&'static str> {
        let class = match self {
            RenderMode::Single | RenderMode::Double => return None,
            RenderMode::Three => match child_tag {
                PathTag::SonTree => "highlightLinks",
                PathTag::Path1Forward | PathTag::Path1Back => "path1Links",
                _ => "normalLinks",
            },
            RenderMode::Quad => match child_tag {
                PathTag::SonTree => "highlightLinks",
                PathTag::Path1Forward | PathTag::Path1Back => "path1Links",
                PathTag::Path2Forward | PathTag::Path2Back => "path2Links",
                PathTag::None => "normalLinks",
            },
            RenderMode::Five => match child_tag {
                PathTag::SonTree => "highlightLinks",
                PathTag::Path1Forward => "path1Links",
                PathTag::Path2Forward => "path2Links",
                _ => "normalLinks",
            },
        };
        Some(class)
    }

    pub fn has_black_tree(self) -> bool {
        self == RenderMode::Five
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "tree" | "1" => Ok(Self::Single),
            "double" | "2" => Ok(Self::Double),
            "three" | "3" => Ok(Self::Three),
            "quad" | "four" | "4" => Ok(Self::Quad),
            "five" | "5" => Ok(Self::Five),
            other => Err(Error::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

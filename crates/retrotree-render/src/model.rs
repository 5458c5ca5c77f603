use indexmap::IndexMap;
use retrotree_core::{LegendTable, NodeId, NodeKind, PathTag, RenderMode};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct LayoutMeta {
    pub mode: RenderMode,
    pub width: f64,
    pub height: f64,
    /// Translation of the root inside the canvas; the viewBox starts at `(-center_x, -center_y)`.
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub effective_config: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }
}

/// A position in polar form (`angle` in radians clockwise from 12 o'clock) and its Cartesian
/// projection around the root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialPoint {
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

impl RadialPoint {
    pub fn new(angle: f64, radius: f64) -> Self {
        let (x, y) = point_radial(angle, radius);
        Self {
            angle,
            radius,
            x,
            y,
        }
    }

    /// Labels on the left half are flipped so they read left to right.
    pub fn on_right_half(&self) -> bool {
        self.angle < std::f64::consts::PI
    }
}

pub fn point_radial(angle: f64, radius: f64) -> (f64, f64) {
    let a = angle - std::f64::consts::FRAC_PI_2;
    (radius * a.cos(), radius * a.sin())
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    #[serde(flatten)]
    pub position: RadialPoint,
    pub kind: NodeKind,
    pub fill: String,
    pub tag: PathTag,
    pub class: Option<String>,
    /// Legend index drawn next to leaves.
    pub label: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutLink {
    pub source: NodeId,
    pub target: NodeId,
    pub tag: PathTag,
    pub class: Option<String>,
    pub from: RadialPoint,
    pub to: RadialPoint,
}

/// A black-tree node drawn at the position of its main-tree counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayNode {
    pub overlay_id: NodeId,
    pub main_id: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub position: RadialPoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadialTreeLayout {
    pub meta: LayoutMeta,
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
    pub overlay: Vec<OverlayNode>,
    pub legend: LegendTable,
    /// Node count per CSS class, in first-seen order.
    pub class_counts: IndexMap<String, usize>,
    pub bounds: Option<Bounds>,
}

impl RadialTreeLayout {
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    pub fn find_node(&self, name: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#![forbid(unsafe_code)]

pub mod export;
pub mod layout;
pub mod model;
pub mod svg;
pub mod tidy;

use crate::model::RadialTreeLayout;
use retrotree_core::{ModeStyle, NodeId, ParsedPayload, Tree};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config: {message}")]
    InvalidConfig { message: String },
    #[error("payload has an empty main tree")]
    EmptyTree,
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Gap between two horizontally adjacent nodes at the same depth. The pair may come in either
/// order, so implementations should be symmetric.
pub trait Separation {
    fn separation(&self, tree: &Tree, a: NodeId, b: NodeId) -> f64;
}

/// The separation rule of a render mode: siblings `1`, cousins the mode's numerator, both divided
/// by their (shared) depth.
#[derive(Debug, Clone, Copy)]
pub struct ModeSeparation(pub ModeStyle);

impl Separation for ModeSeparation {
    fn separation(&self, tree: &Tree, a: NodeId, b: NodeId) -> f64 {
        let same_parent = tree.parent(a) == tree.parent(b);
        self.0.separation(same_parent, tree.depth(a))
    }
}

#[derive(Clone, Default)]
pub struct LayoutOptions {
    /// Overrides the separation rule of the payload's mode.
    pub separation: Option<Arc<dyn Separation + Send + Sync>>,
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("custom_separation", &self.separation.is_some())
            .finish()
    }
}

impl LayoutOptions {
    pub fn with_separation(separation: impl Separation + Send + Sync + 'static) -> Self {
        Self {
            separation: Some(Arc::new(separation)),
        }
    }
}

pub fn layout_parsed(parsed: &ParsedPayload, options: &LayoutOptions) -> Result<RadialTreeLayout> {
    let mode_separation = ModeSeparation(parsed.meta.mode.style());
    let separation: &dyn Separation = match options.separation.as_deref() {
        Some(custom) => custom,
        None => &mode_separation,
    };
    layout::layout_radial_tree(parsed, separation)
}

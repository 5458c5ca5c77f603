#![forbid(unsafe_code)]

//! Tree payload model + path matcher (headless).
//!
//! Design goals:
//! - trees are immutable arenas; matcher output lives in explicit tag side-tables
//! - deterministic, testable outputs (no global state between calls)
//! - runtime-agnostic async APIs (no specific executor required)

pub mod config;
pub mod detect;
pub mod error;
pub mod legend;
pub mod level_index;
pub mod matcher;
pub mod mode;
pub mod overlay;
pub mod payload;
pub mod tree;

pub use config::TreeConfig;
pub use detect::{DetectModeError, detect_mode};
pub use error::{Error, Result};
pub use legend::{LeafLegend, LegendTable};
pub use level_index::LevelIndex;
pub use matcher::{
    AlternatingTags, TagMap, link_tags, mark_alternating, mark_simple, mark_tagged,
    uniform_link_tags,
};
pub use mode::{LeafRule, LegendLayout, ModeStyle, NodeKind, PathTag, RenderMode};
pub use overlay::{OverlayAlignment, align_overlay, alignment_key};
pub use payload::TreePayload;
pub use tree::{NodeId, Tree, TreeBuildOptions, TreeNode};

use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Payload shape to expect. `None` detects it from the top-level keys.
    pub mode: Option<RenderMode>,
}

impl ParseOptions {
    pub fn with_mode(mode: RenderMode) -> Self {
        Self { mode: Some(mode) }
    }

    pub fn detect() -> Self {
        Self { mode: None }
    }
}

#[derive(Debug, Clone)]
pub struct PayloadMeta {
    pub mode: RenderMode,
    /// Site config merged over the built-in defaults.
    pub effective_config: TreeConfig,
}

#[derive(Debug, Clone)]
pub struct ParsedPayload {
    pub meta: PayloadMeta,
    pub payload: TreePayload,
}

impl ParsedPayload {
    pub fn tags(&self) -> TagMap<PathTag> {
        self.payload.tag()
    }

    pub fn legend(&self) -> LeafLegend {
        LeafLegend::build(&self.payload.main, self.meta.mode.style().legend_leaf_rule)
    }

    pub fn legend_table(&self) -> LegendTable {
        let style = self.meta.mode.style();
        let layout = match (style.legend, self.meta.effective_config.get_usize("legendColumns")) {
            (LegendLayout::Grid { .. }, Some(columns)) if columns > 0 => {
                LegendLayout::Grid { columns }
            }
            (layout, _) => layout,
        };
        self.legend().table(layout)
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    site_config: TreeConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            site_config: TreeConfig::defaults(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site_config(mut self, site_config: TreeConfig) -> Self {
        // Merge overrides onto the defaults so renderers always find every key.
        self.site_config.deep_merge(site_config.as_value());
        self
    }

    pub fn site_config(&self) -> &TreeConfig {
        &self.site_config
    }

    /// Synchronous variant of [`Engine::detect_mode`].
    pub fn detect_mode_sync(&self, text: &str) -> Result<RenderMode> {
        let value: Value = serde_json::from_str(text)?;
        Ok(detect_mode(&value)?)
    }

    pub async fn detect_mode(&self, text: &str) -> Result<RenderMode> {
        self.detect_mode_sync(text)
    }

    /// Synchronous variant of [`Engine::parse_payload`].
    ///
    /// The work is CPU-bound and does not perform I/O.
    pub fn parse_payload_sync(&self, text: &str, options: ParseOptions) -> Result<ParsedPayload> {
        let value: Value = serde_json::from_str(text)?;
        self.parse_payload_value(&value, options)
    }

    pub fn parse_payload_value(&self, value: &Value, options: ParseOptions) -> Result<ParsedPayload> {
        let mode = match options.mode {
            Some(mode) => mode,
            None => detect_mode(value)?,
        };
        let payload = TreePayload::from_value(value, mode)?;
        Ok(ParsedPayload {
            meta: PayloadMeta {
                mode,
                effective_config: self.site_config.clone(),
            },
            payload,
        })
    }

    pub async fn parse_payload(&self, text: &str, options: ParseOptions) -> Result<ParsedPayload> {
        self.parse_payload_sync(text, options)
    }
}

#[cfg(test)]
mod tests;

//! Radial placement of a tagged payload.

use crate::model::{
    Bounds, LayoutLink, LayoutMeta, LayoutNode, OverlayNode, RadialPoint, RadialTreeLayout,
};
use crate::tidy::tidy_layout;
use crate::{Error, Result, Separation};
use indexmap::IndexMap;
use retrotree_core::{NodeKind, ParsedPayload, TreeConfig, align_overlay, link_tags};
use std::f64::consts::TAU;

const DEFAULT_SIZE: f64 = 928.0;
const DEFAULT_RADIUS_MARGIN: f64 = 30.0;

/// Canvas geometry resolved from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Canvas {
    pub fn from_config(config: &TreeConfig, center_y_ratio: f64) -> Result<Self> {
        let width = config.get_f64("width").unwrap_or(DEFAULT_SIZE);
        let height = config.get_f64("height").unwrap_or(width);
        let margin = config
            .get_f64("radiusMargin")
            .unwrap_or(DEFAULT_RADIUS_MARGIN);
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("canvas must be positive, got {width}x{height}"),
            });
        }
        let radius = width.min(height) / 2.0 - margin;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("radiusMargin {margin} leaves no room on a {width}x{height} canvas"),
            });
        }
        Ok(Self {
            width,
            height,
            center_x: width * 0.5,
            center_y: height * center_y_ratio,
            radius,
        })
    }
}

fn node_fill(config: &TreeConfig, kind: NodeKind) -> String {
    let (key, fallback) = match kind {
        NodeKind::Leaf => ("node.leafFill", "#8ecfc9"),
        NodeKind::Root => ("node.rootFill", "#beb8dc"),
        NodeKind::Inner => ("node.innerFill", "#82b0d2"),
    };
    config.get_str(key).unwrap_or(fallback).to_string()
}

pub(crate) fn layout_radial_tree(
    parsed: &ParsedPayload,
    separation: &dyn Separation,
) -> Result<RadialTreeLayout> {
    let mode = parsed.meta.mode;
    let style = mode.style();
    let config = &parsed.meta.effective_config;
    let tree = &parsed.payload.main;
    if tree.is_empty() {
        return Err(Error::EmptyTree);
    }

    let canvas = Canvas::from_config(config, style.center_y_ratio)?;
    let points: Vec<RadialPoint> = tidy_layout(tree, TAU, canvas.radius, |a, b| {
        separation.separation(tree, a, b)
    })
    .into_iter()
    .map(|p| RadialPoint::new(p.x, p.y))
    .collect();

    let tags = parsed.tags();
    let legend = parsed.legend();
    let mut class_counts: IndexMap<String, usize> = IndexMap::new();

    let nodes: Vec<LayoutNode> = tree
        .iter()
        .map(|(id, node)| {
            let tag = tags.get(id);
            let kind = style.node_kind(tree, id);
            let class = mode.node_class(tag).map(str::to_string);
            if let Some(class) = &class {
                *class_counts.entry(class.clone()).or_insert(0) += 1;
            }
            LayoutNode {
                id,
                name: node.name.clone(),
                depth: node.depth,
                position: points[id.index()],
                kind,
                fill: node_fill(config, kind),
                tag,
                class,
                label: legend.label(id),
            }
        })
        .collect();

    let links: Vec<LayoutLink> = link_tags(tree, &tags)
        .into_iter()
        .map(|(source, target, tag)| LayoutLink {
            source,
            target,
            tag,
            class: mode.link_class(tag).map(str::to_string),
            from: points[source.index()],
            to: points[target.index()],
        })
        .collect();

    let overlay: Vec<OverlayNode> = match (&parsed.payload.black_tree, mode.has_black_tree()) {
        (Some(black), true) => {
            let alignment = align_overlay(tree, black);
            if !alignment.unmatched.is_empty() {
                tracing::debug!(
                    unmatched = alignment.unmatched.len(),
                    "black-tree nodes skipped"
                );
            }
            alignment
                .matched
                .into_iter()
                .map(|(overlay_id, main_id)| OverlayNode {
                    overlay_id,
                    main_id,
                    name: black.name(overlay_id).to_string(),
                    position: points[main_id.index()],
                })
                .collect()
        }
        _ => Vec::new(),
    };

    let bounds = Bounds::from_points(points.iter().map(|p| (p.x, p.y)));

    tracing::debug!(
        mode = %mode,
        nodes = nodes.len(),
        links = links.len(),
        overlay = overlay.len(),
        radius = canvas.radius,
        "radial layout finished"
    );

    Ok(RadialTreeLayout {
        meta: LayoutMeta {
            mode,
            width: canvas.width,
            height: canvas.height,
            center_x: canvas.center_x,
            center_y: canvas.center_y,
            radius: canvas.radius,
            effective_config: config.as_value().clone(),
        },
        nodes,
        links,
        overlay,
        legend: parsed.legend_table(),
        class_counts,
        bounds,
    })
}

//! SVG output for radial tree layouts.

mod util;

pub(crate) use util::escape_xml;
use util::{css_value, fmt};

use crate::model::{RadialPoint, RadialTreeLayout, point_radial};
use retrotree_core::TreeConfig;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg id>`; also scopes the embedded stylesheet.
    pub diagram_id: Option<String>,
    /// Embed the class stylesheet so the file renders the same outside the page.
    pub embed_style: bool,
    /// Add a `<title>` with the node name to every node (hover tooltip in browsers).
    pub node_titles: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            embed_style: true,
            node_titles: true,
        }
    }
}

/// Radial bump link between two polar points, as a cubic Bézier path:
/// the control points sit at the mid radius on the source and target angles.
pub fn link_radial_path(from: &RadialPoint, to: &RadialPoint) -> String {
    let mid = (from.radius + to.radius) / 2.0;
    let (x0, y0) = (from.x, from.y);
    let (x1, y1) = point_radial(from.angle, mid);
    let (x2, y2) = point_radial(to.angle, mid);
    let (x3, y3) = (to.x, to.y);
    format!(
        "M{},{}C{},{},{},{},{},{}",
        fmt(x0),
        fmt(y0),
        fmt(x1),
        fmt(y1),
        fmt(x2),
        fmt(y2),
        fmt(x3),
        fmt(y3)
    )
}

fn node_transform(p: &RadialPoint) -> String {
    format!(
        "rotate({}) translate({},0)",
        fmt(p.angle.to_degrees() - 90.0),
        fmt(p.radius)
    )
}

fn theme(config: &TreeConfig, key: &str, fallback: &str) -> String {
    css_value(config.get_str(key).unwrap_or(fallback))
}

/// Stylesheet for the node/link classes, scoped to `#diagram_id`.
pub fn tree_css(diagram_id: &str, config: &TreeConfig) -> String {
    let id = escape_xml(diagram_id);
    let highlight = theme(config, "theme.highlight", "#9b59b6");
    let path1 = theme(config, "theme.path1", "#e74c3c");
    let path1_highlight = theme(config, "theme.path1Highlight", "#c0392b");
    let path2 = theme(config, "theme.path2", "#f39c12");
    let path2_highlight = theme(config, "theme.path2Highlight", "#d35400");
    let link_width = fmt(config.get_f64("theme.highlightStrokeWidth").unwrap_or(2.0));
    let black_stroke = theme(config, "blackTree.stroke", "black");
    let black_width = fmt(config.get_f64("blackTree.strokeWidth").unwrap_or(1.5));

    let mut css = String::new();
    let _ = write!(&mut css, "#{id} .highlight{{fill:{highlight};}}");
    let _ = write!(&mut css, "#{id} .path1_normal,#{id} .path1{{fill:{path1};}}");
    let _ = write!(&mut css, "#{id} .path1_highlight{{fill:{path1_highlight};}}");
    let _ = write!(&mut css, "#{id} .path2_normal,#{id} .path2{{fill:{path2};}}");
    let _ = write!(&mut css, "#{id} .path2_highlight{{fill:{path2_highlight};}}");
    for (class, color) in [
        ("highlightLinks", &highlight),
        ("path1Links", &path1),
        ("path2Links", &path2),
    ] {
        let _ = write!(
            &mut css,
            "#{id} .{class}{{stroke:{color};stroke-opacity:1;stroke-width:{link_width}px;}}"
        );
    }
    let _ = write!(
        &mut css,
        "#{id} .black_tree{{fill:none;stroke:{black_stroke};stroke-width:{black_width}px;}}"
    );
    css
}

pub fn render_radial_tree_svg(layout: &RadialTreeLayout, options: &SvgRenderOptions) -> String {
    let meta = &layout.meta;
    let config = TreeConfig::from_value(meta.effective_config.clone());
    let style = meta.mode.style();

    let diagram_id = options.diagram_id.as_deref().unwrap_or("retrotree");
    let diagram_id_esc = escape_xml(diagram_id);
    let font_size = config.get_f64("fontSize").unwrap_or(10.0);
    let font_family = css_value(config.get_str("fontFamily").unwrap_or("sans-serif"));
    let node_radius = config.get_f64("nodeRadius").unwrap_or(style.node_radius);
    let label_size = config
        .get_f64("label.fontSize")
        .unwrap_or(style.label_font_size);
    let label_offset = config.get_f64("label.offset").unwrap_or(6.0);
    let label_fill = escape_xml(config.get_str("label.fill").unwrap_or("black"));

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{vx} {vy} {w} {h}" style="width: 100%; height: auto; font: {fs}px {ff};" data-mode="{mode}">"#,
        id = diagram_id_esc,
        w = fmt(meta.width),
        h = fmt(meta.height),
        vx = fmt(-meta.center_x),
        vy = fmt(-meta.center_y),
        fs = fmt(font_size),
        ff = font_family,
        mode = meta.mode,
    );

    if options.embed_style {
        let _ = write!(&mut out, "<style>{}</style>", tree_css(diagram_id, &config));
    }

    let _ = write!(
        &mut out,
        r#"<g class="links" fill="none" stroke="{stroke}" stroke-opacity="{opacity}" stroke-width="{width}">"#,
        stroke = escape_xml(config.get_str("link.stroke").unwrap_or("#555")),
        opacity = fmt(config.get_f64("link.strokeOpacity").unwrap_or(0.4)),
        width = fmt(config.get_f64("link.strokeWidth").unwrap_or(1.0)),
    );
    for link in &layout.links {
        let _ = write!(&mut out, r#"<path d="{}""#, link_radial_path(&link.from, &link.to));
        if let Some(class) = &link.class {
            let _ = write!(&mut out, r#" class="{}""#, escape_xml(class));
        }
        out.push_str("/>");
    }
    out.push_str("</g>");

    // Overlay circles go first so the main nodes paint over them.
    if !layout.overlay.is_empty() {
        let black_radius = fmt(config.get_f64("blackTree.radius").unwrap_or(4.25));
        out.push_str(r#"<g class="black-tree">"#);
        for node in &layout.overlay {
            let _ = write!(
                &mut out,
                r#"<g transform="{t}"><circle r="{r}" class="black_tree"/></g>"#,
                t = node_transform(&node.position),
                r = black_radius,
            );
        }
        out.push_str("</g>");
    }

    out.push_str(r#"<g class="nodes">"#);
    for node in &layout.nodes {
        let _ = write!(
            &mut out,
            r#"<g transform="{}">"#,
            node_transform(&node.position)
        );
        if options.node_titles {
            let _ = write!(&mut out, "<title>{}</title>", escape_xml(&node.name));
        }
        let _ = write!(
            &mut out,
            r#"<circle fill="{fill}" r="{r}""#,
            fill = escape_xml(&node.fill),
            r = fmt(node_radius),
        );
        if let Some(class) = &node.class {
            let _ = write!(&mut out, r#" class="{}""#, escape_xml(class));
        }
        out.push_str("/>");

        if let Some(label) = node.label {
            let right = node.position.on_right_half();
            let _ = write!(
                &mut out,
                r#"<text dy="0.31em" x="{x}" text-anchor="{anchor}""#,
                x = fmt(if right { label_offset } else { -label_offset }),
                anchor = if right { "start" } else { "end" },
            );
            if !right {
                out.push_str(r#" transform="rotate(180)""#);
            }
            let _ = write!(&mut out, r#" font-size="{}px""#, fmt(label_size));
            if let Some(family) = style.label_font_family {
                let _ = write!(&mut out, r#" font-family="{}""#, escape_xml(family));
            }
            let _ = write!(&mut out, r#" fill="{label_fill}">{label}</text>"#);
        }
        out.push_str("</g>");
    }
    out.push_str("</g></svg>");
    out
}

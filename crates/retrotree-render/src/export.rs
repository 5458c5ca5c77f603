//! Standalone exports: an HTML page with the diagram and its leaf legend, and the legend JSON.

use crate::model::RadialTreeLayout;
use crate::svg::escape_xml;
use retrotree_core::LegendTable;
use serde_json::Value;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct HtmlPageOptions {
    pub title: String,
}

impl Default for HtmlPageOptions {
    fn default() -> Self {
        Self {
            title: "Retrosynthesis tree".to_string(),
        }
    }
}

/// `<tbody id="indices-container">` rows, one `<td>` per legend cell.
pub fn legend_table_html(table: &LegendTable) -> String {
    let mut out = String::from(r#"<table class="indices"><tbody id="indices-container">"#);
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(&mut out, "<td>{}</td>", escape_xml(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Full page: the rendered SVG inside `#tree-container` followed by the legend table.
pub fn render_html_page(layout: &RadialTreeLayout, svg: &str, options: &HtmlPageOptions) -> String {
    let title = escape_xml(&options.title);
    let mut out = String::new();
    let _ = write!(
        &mut out,
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<style>",
            "body{{font-family:sans-serif;margin:0 auto;max-width:1200px;}}",
            "#tree-container{{width:100%;}}",
            "table.indices{{border-collapse:collapse;margin:1em auto;}}",
            "table.indices td{{border:1px solid #ccc;padding:2px 8px;font-size:12px;}}",
            "</style>\n</head>\n<body data-mode=\"{mode}\">\n",
        ),
        title = title,
        mode = layout.meta.mode,
    );
    let _ = writeln!(&mut out, "<h1>{title}</h1>");
    let _ = writeln!(&mut out, "<div id=\"tree-container\">{svg}</div>");
    out.push_str(&legend_table_html(&layout.legend));
    out.push_str("\n</body>\n</html>\n");
    out
}

/// `{"data": [...]}` with the substance part of every legend cell.
pub fn legend_json(layout: &RadialTreeLayout) -> Value {
    layout.legend.export_json()
}

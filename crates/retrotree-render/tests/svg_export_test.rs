use retrotree_core::{Engine, ParseOptions};
use retrotree_render::export::{HtmlPageOptions, legend_json, legend_table_html, render_html_page};
use retrotree_render::model::RadialTreeLayout;
use retrotree_render::svg::{SvgRenderOptions, render_radial_tree_svg};
use retrotree_render::{LayoutOptions, layout_parsed};
use std::path::PathBuf;

fn layout_fixture(name: &str) -> RadialTreeLayout {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    let parsed = Engine::new()
        .parse_payload_sync(&text, ParseOptions::detect())
        .expect("parse ok");
    layout_parsed(&parsed, &LayoutOptions::default()).expect("layout ok")
}

fn count(doc: &roxmltree::Document<'_>, tag: &str) -> usize {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == tag)
        .count()
}

#[test]
fn single_svg_is_well_formed_and_unclassed() {
    let layout = layout_fixture("single.json");
    let svg = render_radial_tree_svg(&layout, &SvgRenderOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("valid xml");

    let root = doc.root_element();
    assert_eq!(root.attribute("id"), Some("retrotree"));
    let view_box: Vec<f64> = root
        .attribute("viewBox")
        .unwrap()
        .split(' ')
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(view_box.len(), 4);
    assert_eq!((view_box[0], view_box[2], view_box[3]), (-464.0, 928.0, 928.0));
    assert!((view_box[1] + 547.52).abs() < 1e-9);
    assert_eq!(root.attribute("data-mode"), Some("single"));

    assert_eq!(count(&doc, "circle"), layout.nodes.len());
    assert_eq!(count(&doc, "path"), layout.links.len());
    assert_eq!(count(&doc, "title"), layout.nodes.len());
    let labeled = layout.nodes.iter().filter(|n| n.label.is_some()).count();
    assert_eq!(count(&doc, "text"), labeled);

    let circles_with_class = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "circle" && n.attribute("class").is_some())
        .count();
    assert_eq!(circles_with_class, 0);

    let sizes: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "text")
        .filter_map(|n| n.attribute("font-size"))
        .collect();
    assert!(sizes.iter().all(|s| *s == "8px"));
}

#[test]
fn labels_on_the_left_half_are_flipped() {
    let layout = layout_fixture("three.json");
    let svg = render_radial_tree_svg(&layout, &SvgRenderOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("valid xml");

    for text in doc.descendants().filter(|n| n.tag_name().name() == "text") {
        match text.attribute("text-anchor") {
            Some("start") => {
                assert_eq!(text.attribute("x"), Some("6"));
                assert_eq!(text.attribute("transform"), None);
            }
            Some("end") => {
                assert_eq!(text.attribute("x"), Some("-6"));
                assert_eq!(text.attribute("transform"), Some("rotate(180)"));
            }
            other => panic!("unexpected anchor {other:?}"),
        }
        assert_eq!(text.attribute("font-family"), Some("Arial, sans-serif"));
    }
}

#[test]
fn five_svg_draws_black_tree_beneath_nodes() {
    let layout = layout_fixture("five.json");
    let svg = render_radial_tree_svg(
        &layout,
        &SvgRenderOptions {
            diagram_id: Some("five".to_string()),
            ..Default::default()
        },
    );
    let doc = roxmltree::Document::parse(&svg).expect("valid xml");

    let groups: Vec<&str> = doc
        .root_element()
        .children()
        .filter(|n| n.tag_name().name() == "g")
        .filter_map(|n| n.attribute("class"))
        .collect();
    assert_eq!(groups, vec!["links", "black-tree", "nodes"]);

    let black: Vec<_> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("black_tree"))
        .collect();
    assert_eq!(black.len(), layout.overlay.len());
    assert!(black.iter().all(|n| n.attribute("r") == Some("4.25")));

    let main_radius: Vec<&str> = doc
        .descendants()
        .filter(|n| {
            n.tag_name().name() == "circle" && n.attribute("class") != Some("black_tree")
        })
        .filter_map(|n| n.attribute("r"))
        .collect();
    assert!(main_radius.iter().all(|r| *r == "4"));

    let style = doc
        .descendants()
        .find(|n| n.tag_name().name() == "style")
        .and_then(|n| n.text())
        .unwrap_or_default();
    assert!(style.contains("#five .black_tree{fill:none;"));
}

#[test]
fn style_can_be_left_out() {
    let layout = layout_fixture("double.json");
    let svg = render_radial_tree_svg(
        &layout,
        &SvgRenderOptions {
            embed_style: false,
            node_titles: false,
            ..Default::default()
        },
    );
    assert!(!svg.contains("<style>"));
    assert!(!svg.contains("<title>"));
    assert!(svg.contains(r#"class="highlight""#));
}

#[test]
fn html_page_embeds_svg_and_legend() {
    let layout = layout_fixture("double.json");
    let svg = render_radial_tree_svg(&layout, &SvgRenderOptions::default());
    let page = render_html_page(&layout, &svg, &HtmlPageOptions::default());
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(r#"<div id="tree-container"><svg id="retrotree""#));
    assert!(page.contains(r#"<tbody id="indices-container">"#));
    assert!(page.contains("<td>1: Acetic anhydride</td>"));
    assert!(page.contains(r#"<body data-mode="double">"#));

    let table = legend_table_html(&layout.legend);
    assert_eq!(table.matches("<tr>").count(), 2);
}

#[test]
fn legend_json_exports_substance_names() {
    let layout = layout_fixture("double.json");
    assert_eq!(
        legend_json(&layout),
        serde_json::json!({
            "data": [
                "Acetic anhydride",
                "Hydrogen",
                "Aniline",
                "Acetic acid",
                "Phenol",
                "Nitric acid"
            ]
        })
    );
}

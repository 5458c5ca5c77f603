#![forbid(unsafe_code)]

//! `retrotree` renders retrosynthesis route trees as radial tidy trees, headless.
//!
//! A payload carries a main tree and, depending on the mode, secondary trees (a sub-tree, one or
//! two alternative paths, an outline overlay). Secondary trees are matched onto the main tree by
//! node name and depth; the resulting tags drive node and link classes in the SVG.
//!
//! # Features
//!
//! - `render`: enable radial layout + SVG/HTML export (`retrotree::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use retrotree_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use retrotree_render::export::{
        HtmlPageOptions, legend_json, legend_table_html, render_html_page,
    };
    pub use retrotree_render::model::RadialTreeLayout;
    pub use retrotree_render::svg::{SvgRenderOptions, render_radial_tree_svg};
    pub use retrotree_render::{LayoutOptions, ModeSeparation, Separation, layout_parsed};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] retrotree_core::Error),
        #[error(transparent)]
        Render(#[from] retrotree_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so several diagrams can
    /// share one page without their scoped stylesheets leaking into each other.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "t-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "t-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "t" {
            return "t-untitled".to_string();
        }
        out.to_string()
    }

    /// Synchronous layout helper (executor-free).
    pub fn layout_payload_sync(
        engine: &retrotree_core::Engine,
        text: &str,
        parse_options: retrotree_core::ParseOptions,
        layout_options: &LayoutOptions,
    ) -> Result<RadialTreeLayout> {
        let parsed = engine.parse_payload_sync(text, parse_options)?;
        Ok(retrotree_render::layout_parsed(&parsed, layout_options)?)
    }

    pub async fn layout_payload(
        engine: &retrotree_core::Engine,
        text: &str,
        parse_options: retrotree_core::ParseOptions,
        layout_options: &LayoutOptions,
    ) -> Result<RadialTreeLayout> {
        layout_payload_sync(engine, text, parse_options, layout_options)
    }

    /// Synchronous SVG render helper (executor-free).
    pub fn render_svg_sync(
        engine: &retrotree_core::Engine,
        text: &str,
        parse_options: retrotree_core::ParseOptions,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_payload_sync(engine, text, parse_options, layout_options)?;
        Ok(render_radial_tree_svg(&layout, svg_options))
    }

    pub async fn render_svg(
        engine: &retrotree_core::Engine,
        text: &str,
        parse_options: retrotree_core::ParseOptions,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        render_svg_sync(engine, text, parse_options, layout_options, svg_options)
    }

    /// Bundles an [`Engine`](retrotree_core::Engine) with parse, layout and SVG options.
    ///
    /// All work is CPU-bound and does not perform I/O.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub engine: retrotree_core::Engine,
        pub parse: retrotree_core::ParseOptions,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_site_config(mut self, site_config: retrotree_core::TreeConfig) -> Self {
            self.engine = self.engine.with_site_config(site_config);
            self
        }

        pub fn with_mode(mut self, mode: retrotree_core::RenderMode) -> Self {
            self.parse = retrotree_core::ParseOptions::with_mode(mode);
            self
        }

        pub fn parse_payload_sync(&self, text: &str) -> Result<retrotree_core::ParsedPayload> {
            Ok(self.engine.parse_payload_sync(text, self.parse)?)
        }

        pub fn layout_payload_sync(&self, text: &str) -> Result<RadialTreeLayout> {
            layout_payload_sync(&self.engine, text, self.parse, &self.layout)
        }

        pub fn render_svg_sync(&self, text: &str) -> Result<String> {
            render_svg_sync(&self.engine, text, self.parse, &self.layout, &self.svg)
        }

        pub fn render_svg_sync_with_diagram_id(&self, text: &str, diagram_id: &str) -> Result<String> {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            render_svg_sync(&self.engine, text, self.parse, &self.layout, &svg)
        }

        /// Standalone HTML page with the diagram and its leaf legend.
        pub fn render_html_sync(&self, text: &str, page: &HtmlPageOptions) -> Result<String> {
            let layout = self.layout_payload_sync(text)?;
            let svg = render_radial_tree_svg(&layout, &self.svg);
            Ok(render_html_page(&layout, &svg, page))
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_png_sync(
                &self.engine,
                text,
                self.parse,
                &self.layout,
                &self.svg,
                raster,
            )
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_jpeg_sync(
                &self.engine,
                text,
                self.parse,
                &self.layout,
                &self.svg,
                raster,
            )
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf_sync(&self, text: &str) -> raster::Result<Vec<u8>> {
            raster::render_pdf_sync(&self.engine, text, self.parse, &self.layout, &self.svg)
        }
    }

}

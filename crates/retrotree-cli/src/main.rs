use futures::executor::block_on;
use retrotree::render::raster::{RasterError, RasterOptions};
use retrotree::render::{HeadlessError, HeadlessRenderer, HtmlPageOptions, sanitize_svg_id};
use retrotree::{Engine, ParseOptions, PathTag, RenderMode, TreeConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Tree(retrotree::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Tree(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<retrotree::Error> for CliError {
    fn from(value: retrotree::Error) -> Self {
        Self::Tree(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Mark,
    Detect,
    Layout,
    Render,
    Legend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Html,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" => Ok(Self::Html),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    /// `None` detects the mode from the payload keys.
    mode: Option<RenderMode>,
    pretty: bool,
    json: bool,
    config: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    title: Option<String>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Mark,
            input: None,
            mode: Some(RenderMode::Single),
            pretty: false,
            json: false,
            config: None,
            render_format: RenderFormat::Svg,
            render_scale: 1.0,
            background: None,
            diagram_id: None,
            title: None,
            out: None,
        }
    }
}

#[derive(Serialize)]
struct MarkedNode<'a> {
    id: usize,
    name: &'a str,
    depth: usize,
    tag: PathTag,
    class: Option<&'static str>,
}

#[derive(Serialize)]
struct MarkOut<'a> {
    mode: &'static str,
    counts: BTreeMap<&'static str, usize>,
    nodes: Vec<MarkedNode<'a>>,
}

fn usage() -> &'static str {
    "retrotree-cli\n\
\n\
USAGE:\n\
  retrotree-cli [mark] [--mode <m>] [--pretty] [<path>|-]\n\
  retrotree-cli detect [<path>|-]\n\
  retrotree-cli layout [--mode <m>] [--pretty] [--config <file.json>] [<path>|-]\n\
  retrotree-cli render [--mode <m>] [--format svg|html|png|jpg|pdf] [--scale <n>] [--background <color>] [--config <file.json>] [--id <diagram-id>] [--title <text>] [--out <path>] [<path>|-]\n\
  retrotree-cli legend [--mode <m>] [--json] [--config <file.json>] [--out <path>] [<path>|-]\n\
\n\
MODES:\n\
  single (default), double, three, quad, five, auto (detect from payload keys)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - mark prints the per-node path tags of the main tree as JSON.\n\
  - render prints SVG/HTML to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - Set RUST_LOG (e.g. RUST_LOG=retrotree_core=debug) for pipeline diagnostics on stderr.\n\
"
}

fn parse_mode(raw: &str) -> Result<Option<RenderMode>, CliError> {
    if raw.trim().eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    raw.parse::<RenderMode>()
        .map(Some)
        .map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "mark" => args.command = Command::Mark,
            "detect" => args.command = Command::Detect,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "legend" => args.command = Command::Legend,
            "--pretty" => args.pretty = true,
            "--json" => args.json = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.mode = parse_mode(mode)?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--title" => {
                let Some(title) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.title = Some(title.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn build_engine(config: Option<&str>) -> Result<Engine, CliError> {
    let engine = Engine::new();
    let Some(path) = config else {
        return Ok(engine);
    };
    let text = std::fs::read_to_string(path)?;
    let site_config = TreeConfig::from_json_str(&text)?;
    tracing::debug!(path, "site config loaded");
    Ok(engine.with_site_config(site_config))
}

fn parse_options(mode: Option<RenderMode>) -> ParseOptions {
    match mode {
        Some(mode) => ParseOptions::with_mode(mode),
        None => ParseOptions::detect(),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let engine = build_engine(args.config.as_deref())?;
    let options = parse_options(args.mode);

    match args.command {
        Command::Detect => {
            let mode = block_on(engine.detect_mode(&text))?;
            println!("{mode}");
            Ok(())
        }
        Command::Mark => {
            let parsed = block_on(engine.parse_payload(&text, options))?;
            let mode = parsed.meta.mode;
            let tags = parsed.tags();
            let main = &parsed.payload.main;
            let nodes = main
                .iter()
                .map(|(id, node)| {
                    let tag = tags.get(id);
                    MarkedNode {
                        id: id.index(),
                        name: &node.name,
                        depth: node.depth,
                        tag,
                        class: mode.node_class(tag),
                    }
                })
                .collect();
            let mut counts = BTreeMap::new();
            for (_, tag) in tags.iter() {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
            let out = MarkOut {
                mode: mode.as_str(),
                counts,
                nodes,
            };
            write_json(&out, args.pretty)
        }
        Command::Layout => {
            let renderer = HeadlessRenderer {
                engine,
                parse: options,
                ..Default::default()
            };
            let layout = renderer.layout_payload_sync(&text)?;
            write_json(&layout, args.pretty)
        }
        Command::Legend => {
            let parsed = block_on(engine.parse_payload(&text, options))?;
            let table = parsed.legend_table();
            if args.json {
                let value = table.export_json();
                let mut rendered = serde_json::to_string(&value)?;
                rendered.push('\n');
                write_text(&rendered, args.out.as_deref())
            } else {
                let mut rendered = String::new();
                for row in &table.rows {
                    rendered.push_str(&row.join("\t"));
                    rendered.push('\n');
                }
                write_text(&rendered, args.out.as_deref())
            }
        }
        Command::Render => {
            let mut renderer = HeadlessRenderer {
                engine,
                parse: options,
                ..Default::default()
            };
            if let Some(id) = args.diagram_id.as_deref() {
                renderer.svg.diagram_id = Some(sanitize_svg_id(id));
            }
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };

            let format = args.render_format;
            tracing::info!(format = format.extension(), "rendering");
            match format {
                RenderFormat::Svg => {
                    let svg = renderer.render_svg_sync(&text)?;
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Html => {
                    let mut page = HtmlPageOptions::default();
                    if let Some(title) = args.title.clone() {
                        page.title = title;
                    }
                    let html = renderer.render_html_sync(&text, &page)?;
                    write_text(&html, args.out.as_deref())?;
                }
                RenderFormat::Png | RenderFormat::Jpeg | RenderFormat::Pdf => {
                    let bytes = match format {
                        RenderFormat::Png => renderer.render_png_sync(&text, &raster)?,
                        RenderFormat::Jpeg => renderer.render_jpeg_sync(&text, &raster)?,
                        _ => renderer.render_pdf_sync(&text)?,
                    };
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), format.extension())
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)?;
                }
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

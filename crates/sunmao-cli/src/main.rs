mod scene;

use scene::Scene;
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use sunmao::render::raster::{RasterError, RasterOptions, render_tree_png};
use sunmao::render::{HeadlessError, SvgRenderOptions, layout_tree, render_tree_svg};

#[derive(Debug)]
pub(crate) enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(sunmao::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    Scene(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Scene(msg) => write!(f, "invalid scene: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sunmao::Error> for CliError {
    fn from(value: sunmao::Error) -> Self {
        Self::Layout(value)
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
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    render_format: RenderFormat,
    render_scale: f32,
    dpi: f64,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "sunmao-cli\n\
\n\
USAGE:\n\
  sunmao-cli [layout] [--pretty] [-v] [<scene.json>|-]\n\
  sunmao-cli render [--format svg|png] [--scale <n>] [--dpi <n>] [--background <css-color>] [--out <path>] [-v] [<scene.json>|-]\n\
\n\
NOTES:\n\
  - If <scene.json> is omitted or '-', the scene is read from stdin.\n\
  - layout prints every panel's figure-fraction rectangle as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - -v logs layout events to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Layout,
        render_format: RenderFormat::Svg,
        render_scale: 1.0,
        dpi: 100.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
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
            "--dpi" => {
                let Some(dpi) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.dpi = dpi.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
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
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    if args.verbose {
        init_logging();
    }
    let text = read_input(args.input.as_deref())?;
    let scene = Scene::from_json_str(&text)?;
    let mut built = scene.build()?;

    match args.command {
        Command::Layout => {
            let mut layout = layout_tree(&mut built.tree)?;
            built.name_panels(&mut layout);
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let svg_options = SvgRenderOptions {
                dpi: args.dpi,
                ..Default::default()
            };
            match args.render_format {
                RenderFormat::Svg => {
                    let svg = render_tree_svg(&mut built.tree, &svg_options)?;
                    write_text(&svg, args.out.as_deref())
                }
                RenderFormat::Png => {
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = render_tree_png(&mut built.tree, &svg_options, &raster)?;
                    let out = args.out.as_deref().map(std::path::PathBuf::from).unwrap_or_else(
                        || default_raster_out_path(args.input.as_deref(), "png"),
                    );
                    std::fs::write(out, bytes)?;
                    Ok(())
                }
            }
        }
    }
}

fn main() {
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
        eprintln!("{err}");
        std::process::exit(1);
    }
}

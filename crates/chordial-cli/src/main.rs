use chordial::{Dataset, DiagramKind};
use chordial::render::{DiagramRenderer, Surface, SvgRenderOptions};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Dataset(chordial::DatasetError),
    Render(chordial::render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Dataset(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chordial::DatasetError> for CliError {
    fn from(value: chordial::DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<chordial::render::Error> for CliError {
    fn from(value: chordial::render::Error) -> Self {
        Self::Render(value)
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
    Validate,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    width: Option<f64>,
    height: Option<f64>,
    diagram_id: Option<String>,
    out: Option<String>,
    static_output: bool,
    no_tooltips: bool,
}

#[derive(Serialize)]
struct ValidateOut {
    kind: &'static str,
    shapes: usize,
}

fn usage() -> &'static str {
    "chordial-cli\n\
\n\
USAGE:\n\
  chordial-cli validate [<path>|-]\n\
  chordial-cli layout [--pretty] [--width <w>] [--height <h>] [<path>|-]\n\
  chordial-cli render [--width <w>] [--height <h>] [--id <diagram-id>] [--static] [--no-tooltips] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a JSON dataset: {\"type\": \"matrix\"|\"graph\"|\"series\", ...}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - validate prints the detected diagram kind and shape count as JSON.\n\
  - layout prints the geometry model as JSON; render prints SVG to stdout\n\
    by default, use --out to write a file.\n\
  - Width and height default per kind: chord 800x800, sankey 700x300,\n\
    bars 800x400.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--static" => args.static_output = true,
            "--no-tooltips" => args.no_tooltips = true,
            "--width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.width = Some(w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.height = Some(h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
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
    println!();
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

fn kind_name(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Chord => "chord",
        DiagramKind::Sankey => "sankey",
        DiagramKind::Bars => "bars",
    }
}

fn surface_for(args: &Args, dataset: &Dataset) -> Result<Surface, CliError> {
    let default = Surface::default_for(dataset.kind());
    Ok(Surface::new(
        args.width.unwrap_or(default.width),
        args.height.unwrap_or(default.height),
    )?)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let dataset: Dataset = serde_json::from_str(&text)?;

    match args.command {
        Command::Validate => {
            let shapes = match &dataset {
                Dataset::Matrix(matrix) => matrix.validate()?.size(),
                Dataset::Graph(graph) => {
                    let flow = graph.resolve()?;
                    flow.nodes().len() + flow.links().len()
                }
                Dataset::Series(series) => series.validate()?.len(),
            };
            write_json(
                &ValidateOut {
                    kind: kind_name(dataset.kind()),
                    shapes,
                },
                args.pretty,
            )
        }
        Command::Layout => {
            let surface = surface_for(&args, &dataset)?;
            let layout = chordial::render::layout_dataset(&dataset, surface)?;
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let surface = surface_for(&args, &dataset)?;
            let options = SvgRenderOptions {
                diagram_id: args
                    .diagram_id
                    .as_deref()
                    .map(chordial::render::sanitize_svg_id),
                animate: !args.static_output,
                include_tooltips: !args.no_tooltips,
            };
            let mut renderer = DiagramRenderer::new(options);
            let output = renderer.render(&dataset, surface)?;
            write_text(&output.svg, args.out.as_deref())
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

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

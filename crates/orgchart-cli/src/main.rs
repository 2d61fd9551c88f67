use orgchart::render::{LayoutOptions, OrgChartLayout};
use orgchart::{
    ManagerOverride, OrgChartRenderer, Partition, PartitionOverrides, RenderedChart,
    ResolvedHierarchy, RootOverrides, RowSet,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    InvalidArgument(String),
    Io(std::io::Error),
    OrgChart(orgchart::Error),
    Render(orgchart::render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::InvalidArgument(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::OrgChart(err) => write!(f, "{err}"),
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

impl From<orgchart::Error> for CliError {
    fn from(value: orgchart::Error) -> Self {
        Self::OrgChart(value)
    }
}

impl From<orgchart::render::Error> for CliError {
    fn from(value: orgchart::render::Error) -> Self {
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
    Render,
    Levels,
    Layout,
    Orphans,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    partitions: Vec<String>,
    overrides_path: Option<String>,
    overrides: PartitionOverrides,
    config: Option<String>,
    out_dir: Option<String>,
    out: Option<String>,
    combined: bool,
    pretty: bool,
    verbose: u8,
}

fn usage() -> &'static str {
    "orgchart-cli\n\
\n\
USAGE:\n\
  orgchart-cli [render] [--out-dir <dir>] [--out <path>|-] [--combined] [OPTIONS] [<path>|-]\n\
  orgchart-cli levels [--pretty] [OPTIONS] [<path>|-]\n\
  orgchart-cli layout [--pretty] [OPTIONS] [<path>|-]\n\
  orgchart-cli orphans [--pretty] [--partition <name>]... [<path>|-]\n\
\n\
OPTIONS:\n\
  --partition <name>                 only process this location (repeatable)\n\
  --overrides <path>                 JSON/YAML map: {\"<location>\": {\"<title>\": \"<manager>|None\"}}\n\
  --override <location>:<title>=<m>  single override; <m> = None makes the title a root (repeatable)\n\
  --config <path>                    JSON/YAML layout options\n\
  -v, --verbose                      more logging on stderr (repeatable; RUST_LOG wins)\n\
\n\
NOTES:\n\
  - Input is a CSV with 'Title' and 'Manager Title' columns; every other column is a location\n\
    flag (> 0 means the row belongs to that location).\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - render writes org_chart_<location>.drawio per location into --out-dir (default: .).\n\
  - --out writes a single document: one location, or every location with --combined.\n\
  - --combined without --out writes org_charts.drawio into --out-dir.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

/// Parses `<location>:<title>=<manager>`.
fn parse_override(raw: &str) -> Result<(String, String, ManagerOverride), CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "invalid --override {raw:?}; expected <location>:<title>=<manager>"
        ))
    };
    let (location, rest) = raw.split_once(':').ok_or_else(invalid)?;
    let (title, manager) = rest.split_once('=').ok_or_else(invalid)?;
    let (location, title, manager) = (location.trim(), title.trim(), manager.trim());
    if location.is_empty() || title.is_empty() || manager.is_empty() {
        return Err(invalid());
    }
    Ok((
        location.to_string(),
        title.to_string(),
        ManagerOverride::parse(manager),
    ))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "levels" => args.command = Command::Levels,
            "layout" => args.command = Command::Layout,
            "orphans" => args.command = Command::Orphans,
            "--pretty" => args.pretty = true,
            "--combined" => args.combined = true,
            "-v" | "--verbose" => args.verbose = args.verbose.saturating_add(1),
            "--partition" => args.partitions.push(next_value(&mut it)?.clone()),
            "--overrides" => args.overrides_path = Some(next_value(&mut it)?.clone()),
            "--override" => {
                let (location, title, value) = parse_override(next_value(&mut it)?)?;
                args.overrides.insert(location, title, value);
            }
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--out-dir" => args.out_dir = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
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

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
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

fn is_yaml(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn load_overrides(args: &Args) -> Result<PartitionOverrides, CliError> {
    let mut overrides = match args.overrides_path.as_deref() {
        None => PartitionOverrides::new(),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            if is_yaml(path) {
                PartitionOverrides::from_yaml_str(&text)?
            } else {
                PartitionOverrides::from_json_str(&text)?
            }
        }
    };
    // Flags are applied after the file so they can patch it.
    overrides.extend(args.overrides.clone());
    Ok(overrides)
}

fn load_options(path: Option<&str>) -> Result<LayoutOptions, CliError> {
    let Some(path) = path else {
        return Ok(LayoutOptions::default());
    };
    let text = std::fs::read_to_string(path)?;
    if is_yaml(path) {
        Ok(LayoutOptions::from_yaml_str(&text)?)
    } else {
        Ok(LayoutOptions::from_json_str(&text)?)
    }
}

fn select_partitions(rows: &RowSet, names: &[String]) -> Result<Vec<Partition>, CliError> {
    if names.is_empty() {
        return Ok(rows.partitions());
    }
    names
        .iter()
        .map(|name| rows.partition(name).map_err(CliError::from))
        .collect()
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    use std::io::Write;
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: &str) -> Result<(), CliError> {
    if out == "-" {
        print!("{text}");
        return Ok(());
    }
    std::fs::write(out, text)?;
    tracing::info!(path = out, "wrote document");
    Ok(())
}

/// Rejects locations whose names sanitize to the same output file.
fn check_file_names(charts: &[RenderedChart]) -> Result<(), CliError> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for chart in charts {
        if let Some(first) = seen.insert(chart.file_name(), &chart.partition) {
            return Err(CliError::InvalidArgument(format!(
                "locations {first:?} and {:?} would both be written to {}; rename one or use --combined",
                chart.partition,
                chart.file_name()
            )));
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let rows = RowSet::from_csv_str(&text)?;
    let overrides = load_overrides(&args)?;
    let renderer = OrgChartRenderer::new(load_options(args.config.as_deref())?);
    let partitions = select_partitions(&rows, &args.partitions)?;

    tracing::info!(
        rows = rows.len(),
        locations = %rows.location_columns.join(", "),
        "detected locations"
    );

    let empty = RootOverrides::new();
    let overrides_for =
        |partition: &Partition| overrides.for_partition(partition.name()).unwrap_or(&empty).clone();

    match args.command {
        Command::Orphans => {
            let mut out = Map::new();
            for partition in &partitions {
                out.insert(
                    partition.name().to_string(),
                    serde_json::to_value(partition.orphans())?,
                );
            }
            write_json(&Value::Object(out), args.pretty)
        }
        Command::Levels => {
            let resolved = partitions
                .into_iter()
                .map(|p| {
                    let o = overrides_for(&p);
                    orgchart::resolve(p, &o)
                })
                .collect::<Result<Vec<ResolvedHierarchy>, _>>()?;
            write_json(&resolved, args.pretty)
        }
        Command::Layout => {
            let layouts = partitions
                .into_iter()
                .map(|p| {
                    let o = overrides_for(&p);
                    renderer.layout(p, &o)
                })
                .collect::<Result<Vec<OrgChartLayout>, _>>()?;
            write_json(&layouts, args.pretty)
        }
        Command::Render => {
            if args.out.is_some() && !args.combined && partitions.len() != 1 {
                return Err(CliError::InvalidArgument(format!(
                    "--out needs exactly one location or --combined ({} selected)",
                    partitions.len()
                )));
            }

            let mut charts = Vec::with_capacity(partitions.len());
            for partition in partitions {
                let o = overrides_for(&partition);
                charts.push(renderer.render_partition(partition, &o)?);
            }

            let out_dir = PathBuf::from(args.out_dir.as_deref().unwrap_or("."));
            if args.out.is_none() {
                std::fs::create_dir_all(&out_dir)?;
            }
            if args.combined {
                let layouts: Vec<OrgChartLayout> =
                    charts.into_iter().map(|c| c.layout).collect();
                let doc = orgchart::render::render_drawio(&layouts, &renderer.options);
                let out = args.out.clone().unwrap_or_else(|| {
                    out_dir.join("org_charts.drawio").to_string_lossy().to_string()
                });
                return write_text(&doc, &out);
            }
            if let Some(out) = args.out.as_deref() {
                let doc = charts.first().map(|c| c.document.as_str()).unwrap_or_default();
                return write_text(doc, out);
            }

            check_file_names(&charts)?;
            for chart in &charts {
                let path = out_dir.join(chart.file_name());
                write_text(&chart.document, &path.to_string_lossy())?;
            }
            Ok(())
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
            std::process::exit(2);
        }
    };

    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::InvalidArgument(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

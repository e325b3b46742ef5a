//! Command-line front end for `nodepatch-core`.
//!
//! Reads a stored node document (SOURCE) and an edited one (TARGET, or STDIN
//! when omitted) and prints the patch operations that turn one into the
//! other. Exit status is 0 when no operations were produced, 1 when some
//! were, and 2 on any error, including a refused incomplete patch.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use nodepatch_core::{
    PatchFormat, PatchOptions, PatchResult, PointerStyle, RenderConfig, SubmitPolicy, Value,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NODEPATCH_LOG";
const EXIT_ERROR: i32 = 2;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    /// JSON array that keeps the value recorded on `remove` operations.
    #[default]
    Json,
    /// RFC 6902 JSON Patch without values on `remove`.
    Strict,
    /// One `+`/`-`/`~` line per operation.
    Text,
}

#[derive(Debug, Parser)]
#[command(
    name = "nodepatch",
    version,
    about = "Compute patch operations between two node documents.",
    override_usage = "nodepatch [OPTIONS] SOURCE [TARGET]"
)]
struct Cli {
    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    format: OutputFormat,

    /// Render text output using ANSI colors.
    #[arg(long = "color", action = ArgAction::SetTrue)]
    color: bool,

    /// Write output to FILE instead of STDOUT.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Prefix for every emitted path, e.g. `/properties`.
    #[arg(long = "base-path", default_value = "")]
    base_path: String,

    /// Escape `~` and `/` inside keys when building paths.
    #[arg(long = "escape-keys", action = ArgAction::SetTrue)]
    escape_keys: bool,

    /// Treat RFC 3339 timestamps as dates.
    #[arg(long = "detect-dates", action = ArgAction::SetTrue)]
    detect_dates: bool,

    /// Read both inputs as YAML instead of JSON.
    #[arg(long = "yaml", action = ArgAction::SetTrue)]
    yaml: bool,

    /// Emit the operations even when the status is not OK.
    #[arg(long = "allow-partial", action = ArgAction::SetTrue)]
    allow_partial: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// SOURCE \[TARGET].
    #[arg(required = true, num_args = 1..=2)]
    inputs: Vec<OsString>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match try_main(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "nodepatch: {err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn try_main(cli: &Cli) -> Result<i32> {
    let (source, target) = match cli.inputs.as_slice() {
        [source] => (InputSource::File(path_from(source)?), InputSource::Stdin),
        [source, target] => {
            (InputSource::File(path_from(source)?), InputSource::File(path_from(target)?))
        }
        _ => bail!("expected SOURCE and optional TARGET"),
    };

    let options = build_options(cli)?;
    let source_text = read_input(&source)?;
    let target_text = read_input(&target)?;
    let source = parse_value(&source_text, cli.yaml, &options)
        .with_context(|| format!("failed to parse {source}"))?;
    let target = parse_value(&target_text, cli.yaml, &options)
        .with_context(|| format!("failed to parse {target}"))?;

    let result = source.patch_to(&target, &options);
    tracing::info!(operations = result.len(), status = %result.status, "patch built");

    let policy =
        if cli.allow_partial { SubmitPolicy::AllowPartial } else { SubmitPolicy::RequireOk };
    result.submittable(policy)?;

    let rendered = render(&result, cli)?;
    if let Some(path) = &cli.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    } else {
        print!("{rendered}");
        io::stdout().flush().ok();
    }

    Ok(if result.is_empty() { 0 } else { 1 })
}

fn render(result: &PatchResult, cli: &Cli) -> Result<String> {
    let rendered = match cli.format {
        OutputFormat::Json => result.render_patch(PatchFormat::Debug)?,
        OutputFormat::Strict => result.render_patch(PatchFormat::Strict)?,
        OutputFormat::Text => {
            return Ok(result.render(&RenderConfig::new().with_color(cli.color)));
        }
    };
    Ok(format!("{rendered}\n"))
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("STDIN"),
        }
    }
}

fn path_from(input: &OsString) -> Result<PathBuf> {
    let path = PathBuf::from(input);
    if path.as_os_str().is_empty() {
        bail!("expected file path; got empty string");
    }
    Ok(path)
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
            Ok(buffer)
        }
    }
}

fn parse_value(input: &str, yaml: bool, options: &PatchOptions) -> Result<Value> {
    if yaml {
        Value::from_yaml_str_with(input, options).map_err(|err| anyhow!(err))
    } else {
        Value::from_json_str_with(input, options).map_err(|err| anyhow!(err))
    }
}

fn build_options(cli: &Cli) -> Result<PatchOptions> {
    let style = if cli.escape_keys { PointerStyle::Escaped } else { PointerStyle::Raw };
    let options = PatchOptions::default()
        .with_base_path(cli.base_path.as_str())
        .context("invalid --base-path")?
        .with_pointer_style(style)
        .with_date_detection(cli.detect_dates);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::{build_options, level_for, Cli, OutputFormat};
    use clap::Parser;
    use nodepatch_core::PointerStyle;

    #[test]
    fn output_format_default_is_json() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(7), "trace");
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from([
            "nodepatch",
            "--base-path",
            "/properties",
            "--escape-keys",
            "--detect-dates",
            "a.json",
        ]);
        let options = build_options(&cli).expect("valid options");
        assert_eq!(options.base_path(), "/properties");
        assert_eq!(options.pointer_style(), PointerStyle::Escaped);
        assert!(options.detect_dates());
    }

    #[test]
    fn rejects_relative_base_path() {
        let cli = Cli::parse_from(["nodepatch", "--base-path", "properties", "a.json"]);
        let err = build_options(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("invalid --base-path"));
    }

    #[test]
    fn counts_verbose_flags() {
        let cli = Cli::parse_from(["nodepatch", "-vv", "a.json", "b.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn rejects_three_inputs() {
        assert!(Cli::try_parse_from(["nodepatch", "a", "b", "c"]).is_err());
    }
}

use clap::{ArgAction, Parser};
use lua_deobfuscator_rs::options::{DEFAULT_OUTPUT_SUFFIX, DEFAULT_REPORT_FILE};
use lua_deobfuscator_rs::{Deobfuscator, EscapePolicy, Options, default_output_path};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "luadeob")]
#[command(about = "Decode string tables, rename identifiers and re-indent obfuscated Lua")]
#[command(version)]
struct Cli {
    /// Obfuscated Lua source file
    input: PathBuf,

    /// Output file (defaults to <input stem><suffix>.lua next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suffix appended to the input stem when no output is given
    #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Where to write the plain-text report
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    report: PathBuf,

    /// Do not write a report
    #[arg(long)]
    no_report: bool,

    /// Handling of non-printable octal escapes (preserve, bracket, filter)
    #[arg(long, default_value = "preserve")]
    escape_policy: EscapePolicy,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent_size: usize,

    /// Keep single-letter identifiers as they are
    #[arg(long)]
    no_rename: bool,

    /// Do not insert the header and explanatory comments
    #[arg(long)]
    no_comments: bool,

    /// Also write the statistics as JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// More detailed progress output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            indent_size: self.indent_size,
            escape_policy: self.escape_policy,
            rename_identifiers: !self.no_rename,
            add_comments: !self.no_comments,
            output_suffix: self.suffix.clone(),
            report_path: (!self.no_report).then(|| self.report.clone()),
            stats_json: self.stats_json.clone(),
            ..Options::default()
        }
    }

    const fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose > 0 {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_target(false)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        eprintln!("Deobfuscation failed");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.options();
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input, &options.output_suffix));

    let result = Deobfuscator::new(options).deobfuscate_file(&cli.input, &output)?;
    let stats = &result.stats;

    eprintln!();
    eprintln!("Deobfuscated code written to {}", output.display());
    eprintln!(
        "  {} strings decoded, {} functions, {} lines, {} escapes converted",
        stats.strings_decoded, stats.functions_found, stats.lines_processed, stats.escapes_converted
    );
    if let Some(report) = &result.report_path {
        eprintln!("Report: {}", report.display());
    }
    eprintln!("Run it with: lua {}", output.display());

    Ok(())
}

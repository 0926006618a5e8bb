// sumfit CLI - closest-subset-sum searches over JSON/CSV records

mod aggregate;
mod exit_codes;
mod job;
mod load;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use sumfit_solver::{closest, SearchBudget, SearchProof, SolverError};

use exit_codes::{EXIT_INCOMPLETE, EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};
use job::{InputFormat, JobConfig};

#[derive(Parser)]
#[command(name = "sumfit")]
#[command(about = "Find the subset of records whose weights sum closest to a target")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search from a TOML job file
    #[command(after_help = "\
Examples:
  sumfit run job.toml
  sumfit run job.toml --json
  sumfit run job.toml --output result.json")]
    Run {
        /// Path to the job .toml file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides the job file's output)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run a search from command-line flags, no job file
    #[command(after_help = "\
Examples:
  sumfit find --input invoices.json --target 100000 --field InvoiceValue
  sumfit find --input a.json --input b.csv --target 10101 --json
  sumfit find --input invoices.json --target 100000 --group-by customer.id")]
    Find {
        /// Input file holding records (repeat to union several; .csv parses as CSV)
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Target sum
        #[arg(long)]
        target: f64,

        /// Dotted path to the numeric weight field on each record
        #[arg(long, default_value = "value")]
        field: String,

        /// Group records by this key path and search over per-group totals
        #[arg(long)]
        group_by: Option<String>,

        /// Search budget: maximum candidate extensions to examine
        #[arg(long)]
        max_nodes: Option<u64>,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a job file without running it
    #[command(after_help = "\
Examples:
  sumfit validate job.toml")]
    Validate {
        /// Path to the job .toml file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output } => cmd_run(config, json, output),
        Commands::Find {
            inputs,
            target,
            field,
            group_by,
            max_nodes,
            json,
            output,
        } => {
            let job = ResolvedJob {
                name: "find".into(),
                inputs: inputs
                    .into_iter()
                    .map(|path| {
                        let format = infer_format(&path, None);
                        (path, format)
                    })
                    .collect(),
                target,
                field,
                group_by,
                budget: max_nodes
                    .map(|max_nodes| SearchBudget { max_nodes })
                    .unwrap_or_default(),
                output,
                json,
            };
            run_job(&job)
        }
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// A fully resolved job, flags or TOML alike.
struct ResolvedJob {
    name: String,
    inputs: Vec<(PathBuf, InputFormat)>,
    target: f64,
    field: String,
    group_by: Option<String>,
    budget: SearchBudget,
    output: Option<PathBuf>,
    json: bool,
}

fn infer_format(path: &Path, explicit: Option<InputFormat>) -> InputFormat {
    explicit.unwrap_or_else(|| match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    })
}

fn cmd_run(config_path: PathBuf, json: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::usage(format!("cannot read config: {e}")))?;

    let config = JobConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))?;

    // Input and output paths resolve relative to the job file's directory.
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let inputs = config
        .inputs
        .iter()
        .map(|input| {
            let path = base_dir.join(&input.file);
            let format = infer_format(&path, input.format);
            (path, format)
        })
        .collect();

    let output = output.or_else(|| config.output.json.as_ref().map(|f| base_dir.join(f)));

    let job = ResolvedJob {
        name: config.name,
        inputs,
        target: config.target,
        field: config.field,
        group_by: config.group_by,
        budget: config.budget,
        output,
        json,
    };
    run_job(&job)
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::usage(format!("cannot read config: {e}")))?;
    let config = JobConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))?;
    eprintln!("config OK: {}", config.name);
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    meta: ReportMeta,
    target: f64,
    sum: f64,
    difference: f64,
    combination: Vec<&'a Value>,
    proof: &'a SearchProof,
}

#[derive(Serialize)]
struct ReportMeta {
    name: String,
    engine_version: &'static str,
    run_at: String,
}

fn run_job(job: &ResolvedJob) -> Result<(), CliError> {
    // Union of all inputs, in order.
    let mut records: Vec<Value> = Vec::new();
    for (path, format) in &job.inputs {
        let data = std::fs::read_to_string(path)
            .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", path.display())))?;
        let mut items = match format {
            InputFormat::Json => load::parse_json_items(&data),
            InputFormat::Csv => load::parse_csv_items(&data),
        }
        .map_err(|e| CliError::runtime(format!("{}: {e}", path.display())))?;
        records.append(&mut items);
    }
    let loaded = records.len();

    // Group-by collapses records to per-key totals; the search then runs
    // over the `total` field of those records.
    let (records, field) = match &job.group_by {
        Some(key) => {
            let totals = aggregate::totals_by_key(&records, key, &job.field)
                .map_err(|e| CliError::runtime(e.to_string()))?;
            eprintln!("grouped {loaded} records into {} groups by '{key}'", totals.len());
            (totals, "total".to_string())
        }
        None => (records, job.field.clone()),
    };

    let selection = closest(
        &records,
        job.target,
        |record| load::weight_at(record, &field),
        &job.budget,
    )
    .map_err(|e| match e {
        SolverError::NonFiniteTarget(_) => CliError::usage(e.to_string()),
        SolverError::MissingWeight { .. } | SolverError::NonFiniteWeight { .. } => {
            CliError::runtime(e.to_string())
                .with_hint(format!("every record needs a finite number at '{field}'"))
        }
    })?;

    let report = Report {
        meta: ReportMeta {
            name: job.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        target: job.target,
        sum: selection.sum,
        difference: selection.difference,
        combination: selection.combination.clone(),
        proof: &selection.proof,
    };

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(path) = &job.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if job.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprintln!(
        "closest sum {} to target {} (off by {}) using {} of {} records",
        selection.sum,
        job.target,
        selection.difference,
        selection.combination.len(),
        records.len(),
    );

    if selection.proof.cap_hit {
        return Err(CliError {
            code: EXIT_INCOMPLETE,
            message: "search budget exhausted; result is best-effort".into(),
            hint: Some("raise budget.max_nodes for an exhaustive search".into()),
        });
    }

    Ok(())
}

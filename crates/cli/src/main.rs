use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use lpread_core::{read_model, Model, VariableKind};
use serde::Serialize;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// LP-format model reader.
#[derive(Parser)]
#[command(name = "lpread", version, about = "LP-format optimization model reader")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an .lp file and print the full model as JSON
    Parse {
        /// Path to the LP-format file
        file: PathBuf,
    },

    /// Parse an .lp file and print a model summary
    Check {
        /// Path to the LP-format file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => {
            cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            cmd_check(&file, cli.output, cli.quiet);
        }
    }
}

fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    match read_model(file) {
        Ok(model) => {
            let pretty = serde_json::to_string_pretty(&model)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

#[derive(Serialize)]
struct Summary {
    file: String,
    sense: lpread_core::Sense,
    variables: usize,
    integer_variables: usize,
    constraints: usize,
    quadratic_terms: usize,
    sos_sets: usize,
}

impl Summary {
    fn of(file: &Path, model: &Model) -> Self {
        let integer = model
            .variables
            .iter()
            .filter(|v| {
                matches!(
                    v.kind,
                    VariableKind::Binary | VariableKind::General | VariableKind::SemiInteger
                )
            })
            .count();
        let quadratic = model.objective.quadratic.len()
            + model
                .constraints
                .iter()
                .map(|c| c.expr.quadratic.len())
                .sum::<usize>();
        Summary {
            file: file.display().to_string(),
            sense: model.sense,
            variables: model.variables.len(),
            integer_variables: integer,
            constraints: model.constraints.len(),
            quadratic_terms: quadratic,
            sos_sets: model.sos.len(),
        }
    }
}

fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let model = match read_model(file) {
        Ok(m) => m,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let summary = Summary::of(file, &model);
    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if quiet {
                println!("{}: ok", summary.file);
                return;
            }
            println!("{}: ok", summary.file);
            println!(
                "  sense        {}",
                match summary.sense {
                    lpread_core::Sense::Minimize => "minimize",
                    lpread_core::Sense::Maximize => "maximize",
                }
            );
            println!(
                "  variables    {} ({} integer)",
                summary.variables, summary.integer_variables
            );
            println!("  constraints  {}", summary.constraints);
            println!("  quadratic    {}", summary.quadratic_terms);
            println!("  sos sets     {}", summary.sos_sets);
        }
    }
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}

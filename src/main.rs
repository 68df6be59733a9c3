use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

mod error;
mod executor;
mod generator;
mod mutant;
mod operators;
mod provider;
mod report;
mod runner;
mod score;

use error::{MutationError, Result};
use executor::CommandTestExecutor;
use generator::{active_operators, generate_mutants};
use provider::{FileSourceProvider, SourceProvider};
use runner::{run_mutation_tests, CancellationToken, MutationConfig};
use score::calculate_mutation_score;

#[derive(Parser)]
#[command(name = "al-mutation")]
#[command(about = "Mutation testing engine for AL code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate mutants and run the test suite against each of them
    Run {
        /// AL source file to mutate
        #[arg(short, long)]
        source: PathBuf,

        /// Test artifact to run against each mutant
        #[arg(short, long)]
        tests: PathBuf,

        /// Test command; `{mutant}` and `{tests}` are substituted with the
        /// candidate source path and the test artifact path
        #[arg(short, long)]
        command: String,

        /// Timeout value per mutant in milliseconds
        #[arg(long, default_value = "30000")]
        timeout: u64,

        /// Run mutants in bounded-concurrency batches
        #[arg(short, long)]
        parallel: bool,

        /// Number of mutants per parallel batch
        #[arg(long, default_value = "4")]
        max_parallel: usize,

        /// Stop the run as soon as one mutant survives
        #[arg(long)]
        stop_on_first_survivor: bool,

        /// Operator codes to enable (default: all)
        #[arg(short, long, value_delimiter = ',')]
        operators: Vec<String>,

        /// Optional path for the JSON report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// List the mutants that would be generated, without running tests
    Mutate {
        /// AL source file to mutate
        #[arg(short, long)]
        source: PathBuf,

        /// Operator codes to enable (default: all)
        #[arg(short, long, value_delimiter = ',')]
        operators: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            tests,
            command,
            timeout,
            parallel,
            max_parallel,
            stop_on_first_survivor,
            operators,
            report,
        } => {
            if timeout == 0 {
                return Err(MutationError::InvalidInput(
                    "--timeout must be positive".to_string(),
                ));
            }
            if max_parallel == 0 {
                return Err(MutationError::InvalidInput(
                    "--max-parallel must be positive".to_string(),
                ));
            }

            let config = MutationConfig {
                test_timeout: Duration::from_millis(timeout),
                parallel_execution: parallel,
                max_parallel_mutants: max_parallel,
                stop_on_first_survivor,
                enabled_operators: operators,
            };

            let cancel = CancellationToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    println!("\nInterrupt received; finishing current work");
                    signal.cancel();
                }
            });

            let provider = FileSourceProvider;
            let executor = CommandTestExecutor::new(command);
            let results =
                run_mutation_tests(&source, &tests, &provider, &executor, &config, &cancel).await?;

            let score = calculate_mutation_score(&results);
            report::print_summary(&score);

            if let Some(report_path) = report {
                // Generation is deterministic, so re-deriving the mutant list
                // pairs up with the result sequence.
                let source_text = provider.read(&source)?;
                let mutants =
                    generate_mutants(&source_text, &active_operators(&config.enabled_operators));
                let data = report::build_report(&source, &mutants, &results, &score);
                report::save_report(&data, &report_path)?;
            }
        }
        Commands::Mutate { source, operators } => {
            let provider = FileSourceProvider;
            let source_text = provider.read(&source)?;
            let mutants = generate_mutants(&source_text, &active_operators(&operators));

            for (index, mutant) in mutants.iter().enumerate() {
                println!(
                    "M{} {} at line {}: {} -> {}",
                    index + 1,
                    mutant.mutation.operator,
                    mutant.mutation.line + 1,
                    mutant.mutation.original,
                    mutant.mutation.mutated
                );
            }
            println!("Total mutants: {}", mutants.len());
        }
    }

    Ok(())
}

use crate::error::Result;
use crate::executor::TestExecutor;
use crate::generator::{active_operators, generate_mutants};
use crate::mutant::Mutant;
use crate::provider::{mutant_artifact_path, SourceProvider};
use crate::score::{MutantStatus, MutationTestResult};
use futures::future::join_all;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runner configuration, consumed as an immutable value; the core never
/// mutates it.
#[derive(Debug, Clone)]
pub struct MutationConfig {
    pub test_timeout: Duration,
    pub parallel_execution: bool,
    pub max_parallel_mutants: usize,
    pub stop_on_first_survivor: bool,
    /// Operator codes to activate; empty means all.
    pub enabled_operators: Vec<String>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            test_timeout: Duration::from_secs(30),
            parallel_execution: false,
            max_parallel_mutants: 4,
            stop_on_first_survivor: false,
            enabled_operators: Vec::new(),
        }
    }
}

/// Cooperative cancellation signal. Checked before each mutant in sequential
/// mode and at batch boundaries in parallel mode; never preemptive.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct RunContext<'a, E> {
    source_unit: &'a Path,
    test_artifact: &'a Path,
    provider: &'a dyn SourceProvider,
    executor: &'a E,
    config: &'a MutationConfig,
}

/// Generate all mutants for the source unit and execute the test suite
/// against each one. Always returns whatever partial or complete result
/// sequence was gathered; per-mutant failures never abort the run. Only an
/// unreadable source unit fails the run as a whole.
pub async fn run_mutation_tests<E: TestExecutor>(
    source_unit: &Path,
    test_artifact: &Path,
    provider: &dyn SourceProvider,
    executor: &E,
    config: &MutationConfig,
    cancel: &CancellationToken,
) -> Result<Vec<MutationTestResult>> {
    let source = provider.read(source_unit)?;

    let operators = active_operators(&config.enabled_operators);
    let mutants = generate_mutants(&source, &operators);

    if mutants.is_empty() {
        println!("No mutants generated for {}", source_unit.display());
        return Ok(Vec::new());
    }
    println!(
        "Generated {} mutants for {}",
        mutants.len(),
        source_unit.display()
    );

    let ctx = RunContext {
        source_unit,
        test_artifact,
        provider,
        executor,
        config,
    };

    let results = if config.parallel_execution {
        run_parallel(&ctx, &mutants, cancel).await
    } else {
        run_sequential(&ctx, &mutants, cancel).await
    };

    Ok(results)
}

async fn run_sequential<E: TestExecutor>(
    ctx: &RunContext<'_, E>,
    mutants: &[Mutant],
    cancel: &CancellationToken,
) -> Vec<MutationTestResult> {
    let mut results = Vec::new();

    for (index, mutant) in mutants.iter().enumerate() {
        if cancel.is_cancelled() {
            println!("Mutation testing cancelled; returning partial results");
            break;
        }

        println!(
            "[{}/{}] {} at line {}: {} -> {}",
            index + 1,
            mutants.len(),
            mutant.mutation.operator,
            mutant.mutation.line + 1,
            mutant.mutation.original,
            mutant.mutation.mutated
        );

        let result = test_mutant(ctx, format!("M{}", index + 1), mutant).await;
        let stop = ctx.config.stop_on_first_survivor && result.status == MutantStatus::Survived;
        println!(
            "  {} ({}ms)",
            result.status,
            result.execution_time.as_millis()
        );
        results.push(result);

        if stop {
            println!("First survivor found; stopping early");
            break;
        }
    }

    results
}

async fn run_parallel<E: TestExecutor>(
    ctx: &RunContext<'_, E>,
    mutants: &[Mutant],
    cancel: &CancellationToken,
) -> Vec<MutationTestResult> {
    let mut results = Vec::new();
    let batch_size = ctx.config.max_parallel_mutants.max(1);
    let total_batches = mutants.len().div_ceil(batch_size);

    for (batch_index, batch) in mutants.chunks(batch_size).enumerate() {
        // Cancellation is only observed at batch boundaries; in-flight
        // mutants of the current batch run to completion.
        if cancel.is_cancelled() {
            println!("Mutation testing cancelled; returning partial results");
            break;
        }

        println!(
            "Batch {}/{} ({} mutants)",
            batch_index + 1,
            total_batches,
            batch.len()
        );

        // join_all yields results in input order, so the output sequence
        // matches generation order regardless of completion order.
        let batch_results = join_all(batch.iter().enumerate().map(|(offset, mutant)| {
            test_mutant(ctx, format!("M{}", batch_index * batch_size + offset + 1), mutant)
        }))
        .await;

        for result in &batch_results {
            println!(
                "  {}: {} ({}ms)",
                result.mutant_id,
                result.status,
                result.execution_time.as_millis()
            );
        }
        results.extend(batch_results);
    }

    results
}

async fn test_mutant<E: TestExecutor>(
    ctx: &RunContext<'_, E>,
    mutant_id: String,
    mutant: &Mutant,
) -> MutationTestResult {
    let start = Instant::now();
    let artifact = mutant_artifact_path(ctx.source_unit, &mutant_id);

    let (outcome, execution_time) = match ctx.provider.write(&artifact, &mutant.code) {
        Ok(()) => {
            let outcome = ctx
                .executor
                .run(&mutant.code, ctx.test_artifact, ctx.config.test_timeout)
                .await;
            let elapsed = start.elapsed();
            // Cleanup failure must never mask the test outcome.
            if let Err(e) = ctx.provider.remove(&artifact) {
                println!(
                    "warning: could not remove mutant artifact {}: {}",
                    artifact.display(),
                    e
                );
            }
            (outcome, elapsed)
        }
        Err(e) => (Err(e), start.elapsed()),
    };

    match outcome {
        Ok(outcome) if outcome.passed => MutationTestResult {
            mutant_id,
            status: MutantStatus::Survived,
            killed_by: None,
            execution_time,
            error_message: None,
        },
        Ok(outcome) => {
            let killed_by = if outcome.failed_tests.is_empty() {
                vec!["TestSuite".to_string()]
            } else {
                outcome.failed_tests
            };
            MutationTestResult {
                mutant_id,
                status: MutantStatus::Killed,
                killed_by: Some(killed_by),
                execution_time,
                error_message: None,
            }
        }
        Err(e) => {
            if execution_time >= ctx.config.test_timeout {
                MutationTestResult {
                    mutant_id,
                    status: MutantStatus::Timeout,
                    killed_by: None,
                    execution_time,
                    error_message: Some("test execution timeout".to_string()),
                }
            } else {
                MutationTestResult {
                    mutant_id,
                    status: MutantStatus::Error,
                    killed_by: None,
                    execution_time,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }
}

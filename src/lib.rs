//! # al-mutation
//!
//! A mutation testing engine for AL code.
//!
//! This library provides functionality to:
//! - Generate single-line mutants with six textual mutation operators
//!   (AOR, ROR, LCR, SDL, RVR, BVR)
//! - Run the existing test suite against each mutant, sequentially or in
//!   bounded-concurrency batches, with cooperative cancellation
//! - Aggregate outcomes into a mutation score and quality rating
//! - Render the results as a JSON report
//!
//! ## Example
//!
//! ```rust,no_run
//! use al_mutation::executor::CommandTestExecutor;
//! use al_mutation::provider::FileSourceProvider;
//! use al_mutation::runner::{run_mutation_tests, CancellationToken, MutationConfig};
//! use al_mutation::score::calculate_mutation_score;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = CommandTestExecutor::new("altest {mutant} {tests}");
//!     let results = run_mutation_tests(
//!         Path::new("src/Codeunit50100.al"),
//!         Path::new("test/Codeunit50100.Test.al"),
//!         &FileSourceProvider,
//!         &executor,
//!         &MutationConfig::default(),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//!
//!     let score = calculate_mutation_score(&results);
//!     println!("Mutation score: {:.2}%", score.score);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod executor;
pub mod generator;
pub mod mutant;
pub mod operators;
pub mod provider;
pub mod report;
pub mod runner;
pub mod score;

pub use error::{MutationError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{MutationError, Result};
    pub use crate::executor::{CommandTestExecutor, TestExecutor, TestOutcome};
    pub use crate::generator::{active_operators, generate_mutants};
    pub use crate::mutant::{CodeLocation, Mutant, Mutation};
    pub use crate::operators::{Category, Operator, ALL_OPERATORS};
    pub use crate::provider::{FileSourceProvider, SourceProvider};
    pub use crate::runner::{run_mutation_tests, CancellationToken, MutationConfig};
    pub use crate::score::{
        calculate_mutation_score, quality_rating, MutantStatus, MutationScore, MutationTestResult,
    };
}

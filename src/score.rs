use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Terminal classification of one mutant execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutantStatus {
    Killed,
    Survived,
    Timeout,
    Error,
}

impl fmt::Display for MutantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MutantStatus::Killed => "killed",
            MutantStatus::Survived => "survived",
            MutantStatus::Timeout => "timeout",
            MutantStatus::Error => "error",
        };
        f.write_str(text)
    }
}

/// Outcome of running the test suite against one mutant. Created exactly
/// once per mutant per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTestResult {
    pub mutant_id: String,
    pub status: MutantStatus,
    pub killed_by: Option<Vec<String>>,
    pub execution_time: Duration,
    pub error_message: Option<String>,
}

/// Aggregate statistics over a result collection. Recomputed on request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationScore {
    pub total_mutants: usize,
    pub killed_mutants: usize,
    pub survived_mutants: usize,
    pub timeout_mutants: usize,
    pub error_mutants: usize,
    /// Naive kill rate: killed / total, as a percentage.
    pub score: f64,
    /// (killed + timeout) / (total - error), as a percentage. Timeouts count
    /// as killed; infrastructure errors leave the denominator.
    pub mutation_score_indicator: f64,
}

pub fn calculate_mutation_score(results: &[MutationTestResult]) -> MutationScore {
    let total_mutants = results.len();
    let count = |status: MutantStatus| results.iter().filter(|r| r.status == status).count();
    let killed_mutants = count(MutantStatus::Killed);
    let survived_mutants = count(MutantStatus::Survived);
    let timeout_mutants = count(MutantStatus::Timeout);
    let error_mutants = count(MutantStatus::Error);

    let score = if total_mutants > 0 {
        killed_mutants as f64 / total_mutants as f64 * 100.0
    } else {
        0.0
    };

    let valid_mutants = total_mutants - error_mutants;
    let mutation_score_indicator = if valid_mutants > 0 {
        (killed_mutants + timeout_mutants) as f64 / valid_mutants as f64 * 100.0
    } else {
        0.0
    };

    MutationScore {
        total_mutants,
        killed_mutants,
        survived_mutants,
        timeout_mutants,
        error_mutants,
        score: round2(score),
        mutation_score_indicator: round2(mutation_score_indicator),
    }
}

/// Discrete quality band for a mutation score indicator, lower bounds
/// inclusive.
pub fn quality_rating(indicator: f64) -> &'static str {
    if indicator >= 80.0 {
        "Excellent"
    } else if indicator >= 60.0 {
        "Good"
    } else if indicator >= 40.0 {
        "Fair"
    } else if indicator >= 20.0 {
        "Poor"
    } else {
        "Very Poor"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use crate::error::Result;
use crate::mutant::Mutant;
use crate::score::{quality_rating, MutationScore, MutationTestResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One executed mutant, joined with its descriptor for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutantReport {
    pub id: String,
    pub operator: String,
    /// 1-indexed for display.
    pub line: usize,
    pub original: String,
    pub mutated: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub killed_by: Vec<String>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportData {
    pub source_file: String,
    pub date: String,
    pub score: MutationScore,
    pub mutants: Vec<MutantReport>,
}

/// Join the result sequence back to its originating mutants. Results are in
/// generation order, so an early-stopped run simply yields fewer rows.
pub fn build_report(
    source_unit: &Path,
    mutants: &[Mutant],
    results: &[MutationTestResult],
    score: &MutationScore,
) -> ReportData {
    let now: DateTime<Local> = Local::now();
    let rows = results
        .iter()
        .zip(mutants)
        .map(|(result, mutant)| MutantReport {
            id: result.mutant_id.clone(),
            operator: mutant.mutation.operator.clone(),
            line: mutant.mutation.line + 1,
            original: mutant.mutation.original.clone(),
            mutated: mutant.mutation.mutated.clone(),
            status: result.status.to_string(),
            killed_by: result.killed_by.clone().unwrap_or_default(),
            execution_time_ms: result.execution_time.as_millis() as u64,
            error: result.error_message.clone(),
        })
        .collect();

    ReportData {
        source_file: source_unit.display().to_string(),
        date: now.format("%d/%m/%Y %H:%M:%S").to_string(),
        score: score.clone(),
        mutants: rows,
    }
}

pub fn save_report(report: &ReportData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    println!("Report saved to {}", path.display());
    Ok(())
}

/// Stdout summary in the shape of the JSON report, without the per-mutant
/// rows.
pub fn print_summary(score: &MutationScore) {
    println!("\nMutation statistics:");
    println!("  Total mutants: {}", score.total_mutants);
    println!("  Killed:        {}", score.killed_mutants);
    println!("  Survived:      {}", score.survived_mutants);
    println!("  Timeout:       {}", score.timeout_mutants);
    println!("  Error:         {}", score.error_mutants);
    println!("\nMutation score: {:.2}%", score.score);
    println!(
        "Mutation score indicator: {:.2}%",
        score.mutation_score_indicator
    );
    println!(
        "Test quality: {}",
        quality_rating(score.mutation_score_indicator)
    );
    if score.survived_mutants > 0 {
        println!(
            "{} mutant(s) survived; consider improving test coverage",
            score.survived_mutants
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_mutants;
    use crate::operators::ALL_OPERATORS;
    use crate::score::{calculate_mutation_score, MutantStatus};
    use std::time::Duration;

    fn sample_results(mutants: &[Mutant]) -> Vec<MutationTestResult> {
        mutants
            .iter()
            .enumerate()
            .map(|(i, _)| MutationTestResult {
                mutant_id: format!("M{}", i + 1),
                status: if i % 2 == 0 {
                    MutantStatus::Killed
                } else {
                    MutantStatus::Survived
                },
                killed_by: (i % 2 == 0).then(|| vec!["TestSuite".to_string()]),
                execution_time: Duration::from_millis(12),
                error_message: None,
            })
            .collect()
    }

    #[test]
    fn joins_results_with_descriptors() {
        let source = "if A > B then\n    exit(true);";
        let mutants = generate_mutants(source, &ALL_OPERATORS);
        let results = sample_results(&mutants);
        let score = calculate_mutation_score(&results);

        let report = build_report(Path::new("unit.al"), &mutants, &results, &score);
        assert_eq!(report.source_file, "unit.al");
        assert_eq!(report.mutants.len(), results.len());
        assert_eq!(report.mutants[0].id, "M1");
        assert_eq!(report.mutants[0].operator, mutants[0].mutation.operator);
        assert_eq!(report.mutants[0].line, mutants[0].mutation.line + 1);
        assert_eq!(report.mutants[0].status, "killed");
    }

    #[test]
    fn partial_runs_yield_fewer_rows() {
        let source = "if A > B then\n    exit(true);";
        let mutants = generate_mutants(source, &ALL_OPERATORS);
        let mut results = sample_results(&mutants);
        results.truncate(1);
        let score = calculate_mutation_score(&results);

        let report = build_report(Path::new("unit.al"), &mutants, &results, &score);
        assert_eq!(report.mutants.len(), 1);
    }

    #[test]
    fn report_serialization_round_trips() {
        let report = ReportData {
            source_file: "unit.al".to_string(),
            date: "01/01/2024 12:00:00".to_string(),
            score: calculate_mutation_score(&[]),
            mutants: vec![MutantReport {
                id: "M1".to_string(),
                operator: "AOR".to_string(),
                line: 3,
                original: "+".to_string(),
                mutated: "-".to_string(),
                status: "killed".to_string(),
                killed_by: vec!["TestSuite".to_string()],
                execution_time_ms: 42,
                error: None,
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        let parsed: ReportData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source_file, "unit.al");
        assert_eq!(parsed.mutants.len(), 1);
        assert_eq!(parsed.mutants[0].execution_time_ms, 42);
    }

    #[test]
    fn save_report_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ReportData {
            source_file: "unit.al".to_string(),
            date: "01/01/2024 12:00:00".to_string(),
            score: calculate_mutation_score(&[]),
            mutants: Vec::new(),
        };

        save_report(&report, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"source_file\": \"unit.al\""));
    }
}

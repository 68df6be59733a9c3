use crate::mutant::{CodeLocation, Mutant};
use crate::operators::{Operator, ALL_OPERATORS};

/// Resolve the active operator set from a list of operator codes. An empty
/// list means all operators; unknown codes are silently ignored. A list that
/// selects nothing leaves the full set active rather than producing an empty
/// run.
pub fn active_operators(enabled: &[String]) -> Vec<Operator> {
    if enabled.is_empty() {
        return ALL_OPERATORS.to_vec();
    }
    let selected: Vec<Operator> = ALL_OPERATORS
        .iter()
        .copied()
        .filter(|op| enabled.iter().any(|code| code.eq_ignore_ascii_case(op.code())))
        .collect();
    if selected.is_empty() {
        ALL_OPERATORS.to_vec()
    } else {
        selected
    }
}

/// Scan the source line by line and offer every non-trivial line to every
/// operator, in order. The output is ordered by (line, operator order) and
/// is fully deterministic for a given source and operator set.
pub fn generate_mutants(source: &str, operators: &[Operator]) -> Vec<Mutant> {
    let mut mutants = Vec::new();
    let lines: Vec<&str> = source.split('\n').collect();

    for (line_num, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let location = CodeLocation {
            line: line_num,
            column: 0,
            length: line.len(),
        };

        for operator in operators {
            if let Some(mutant) = operator.apply(source, &location) {
                mutants.push(mutant);
            }
        }
    }

    mutants
}

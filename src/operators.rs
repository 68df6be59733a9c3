use crate::mutant::{CodeLocation, Mutant, Mutation};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The six mutation operator kinds, in the fixed order the generator offers
/// them to each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Arithmetic Operator Replacement
    Aor,
    /// Relational Operator Replacement
    Ror,
    /// Logical Connector Replacement
    Lcr,
    /// Statement Deletion
    Sdl,
    /// Return Value Replacement
    Rvr,
    /// Boundary Value Replacement
    Bvr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Arithmetic,
    Relational,
    Logical,
    Statement,
    Value,
    Boundary,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Arithmetic => "arithmetic",
            Category::Relational => "relational",
            Category::Logical => "logical",
            Category::Statement => "statement",
            Category::Value => "value",
            Category::Boundary => "boundary",
        }
    }
}

pub const ALL_OPERATORS: [Operator; 6] = [
    Operator::Aor,
    Operator::Ror,
    Operator::Lcr,
    Operator::Sdl,
    Operator::Rvr,
    Operator::Bvr,
];

// Substitution tables. Entries are ordered most-specific first and the first
// matching entry wins; only the first replacement of an entry is ever used.
const AOR_TABLE: &[(&str, &[&str])] = &[
    ("+", &["-", "*", "/"]),
    ("-", &["+", "*", "/"]),
    ("*", &["+", "-", "/"]),
    ("/", &["+", "-", "*"]),
    ("div", &["mod"]),
    ("mod", &["div"]),
];

const ROR_TABLE: &[(&str, &[&str])] = &[
    (">=", &[">", "<", "<=", "=", "<>"]),
    ("<=", &["<", ">", ">=", "=", "<>"]),
    ("<>", &["=", ">", "<"]),
    (">", &[">=", "<", "<=", "=", "<>"]),
    ("<", &["<=", ">", ">=", "=", "<>"]),
    ("=", &["<>", ">", "<"]),
];

const LCR_TABLE: &[(&str, &[&str])] = &[("and", &["or"]), ("or", &["and"]), ("not", &[""])];

const RVR_TABLE: &[(&str, &str)] = &[
    ("true", "false"),
    ("false", "true"),
    ("0", "1"),
    ("1", "0"),
    ("''", "'MUTATED'"),
];

// Neighbouring characters that disqualify a symbol match: a hit inside a
// larger operator token (`:=`, `<>`, `//`) is not a token-boundary match.
const ARITHMETIC_GUARD: &str = "+-*/";
const RELATIONAL_GUARD: &str = ":<>=";

static WORD_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    ["div", "mod", "and", "or", "not"]
        .iter()
        .map(|word| {
            let pattern = Regex::new(&format!(r"(?i)\b{word}\b")).expect("static word pattern");
            (*word, pattern)
        })
        .collect()
});

static EXIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bexit\s*\(\s*([^)]*?)\s*\)").expect("static exit pattern"));

static INT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("static integer pattern"));

impl Operator {
    pub fn code(&self) -> &'static str {
        match self {
            Operator::Aor => "AOR",
            Operator::Ror => "ROR",
            Operator::Lcr => "LCR",
            Operator::Sdl => "SDL",
            Operator::Rvr => "RVR",
            Operator::Bvr => "BVR",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Operator::Aor => Category::Arithmetic,
            Operator::Ror => Category::Relational,
            Operator::Lcr => Category::Logical,
            Operator::Sdl => Category::Statement,
            Operator::Rvr => Category::Value,
            Operator::Bvr => Category::Boundary,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operator::Aor => "Arithmetic Operator Replacement",
            Operator::Ror => "Relational Operator Replacement",
            Operator::Lcr => "Logical Connector Replacement",
            Operator::Sdl => "Statement Deletion",
            Operator::Rvr => "Return Value Replacement",
            Operator::Bvr => "Boundary Value Replacement",
        }
    }

    pub fn from_code(code: &str) -> Option<Operator> {
        ALL_OPERATORS
            .iter()
            .copied()
            .find(|op| op.code().eq_ignore_ascii_case(code))
    }

    /// Propose a mutation of the line referenced by `location`, or `None`
    /// when no trigger pattern is present there. Pure: the same source and
    /// location always yield the same result.
    pub fn apply(&self, source: &str, location: &CodeLocation) -> Option<Mutant> {
        let lines: Vec<&str> = source.split('\n').collect();
        if location.line >= lines.len() {
            return None;
        }
        match self {
            Operator::Aor => apply_aor(&lines, location),
            Operator::Ror => apply_ror(&lines, location),
            Operator::Lcr => apply_lcr(&lines, location),
            Operator::Sdl => apply_sdl(&lines, location),
            Operator::Rvr => apply_rvr(&lines, location),
            Operator::Bvr => apply_bvr(&lines, location),
        }
    }
}

fn apply_aor(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    apply_table(lines, location, Operator::Aor, AOR_TABLE, ARITHMETIC_GUARD)
}

fn apply_ror(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    apply_table(lines, location, Operator::Ror, ROR_TABLE, RELATIONAL_GUARD)
}

fn apply_lcr(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    let line = lines[location.line];
    for (trigger, replacements) in LCR_TABLE {
        if let Some((start, end)) = find_word(line, trigger, location) {
            let replacement = replacements[0];
            let mutated_line = splice(line, start, end, replacement);
            let described = if replacement.is_empty() {
                "[removed]"
            } else {
                replacement
            };
            return Some(make_mutant(
                lines,
                location,
                &mutated_line,
                Operator::Lcr,
                &line[start..end],
                described,
            ));
        }
    }
    None
}

fn apply_sdl(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    let line = lines[location.line];
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Deleting declarations or block delimiters produces code that cannot
    // compile, which is not a meaningful mutation.
    let lowered = trimmed.to_ascii_lowercase();
    if lowered == "var"
        || lowered.starts_with("var ")
        || lowered.starts_with("begin")
        || lowered.starts_with("end")
    {
        return None;
    }
    Some(make_mutant(
        lines,
        location,
        "",
        Operator::Sdl,
        trimmed,
        "[deleted]",
    ))
}

fn apply_rvr(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    let line = lines[location.line];
    let caps = EXIT_PATTERN.captures(line)?;
    let whole = caps.get(0)?;
    let argument = caps.get(1)?.as_str().trim();
    for (original, replacement) in RVR_TABLE {
        if argument.eq_ignore_ascii_case(original) {
            let mutated_line = splice(
                line,
                whole.start(),
                whole.end(),
                &format!("exit({replacement})"),
            );
            return Some(make_mutant(
                lines,
                location,
                &mutated_line,
                Operator::Rvr,
                &format!("exit({original})"),
                &format!("exit({replacement})"),
            ));
        }
    }
    None
}

fn apply_bvr(lines: &[&str], location: &CodeLocation) -> Option<Mutant> {
    let line = lines[location.line];
    let found = INT_PATTERN
        .find_iter(line)
        .find(|m| in_window(m.start(), location))?;
    let value: i64 = found.as_str().parse().ok()?;
    // First viable boundary substitution: value + 1 (then value - 1, then 0/1).
    let replacement = value.checked_add(1)?.to_string();
    let mutated_line = splice(line, found.start(), found.end(), &replacement);
    Some(make_mutant(
        lines,
        location,
        &mutated_line,
        Operator::Bvr,
        found.as_str(),
        &replacement,
    ))
}

fn apply_table(
    lines: &[&str],
    location: &CodeLocation,
    operator: Operator,
    table: &[(&str, &[&str])],
    guard: &str,
) -> Option<Mutant> {
    let line = lines[location.line];
    for (trigger, replacements) in table {
        let found = if is_word(trigger) {
            find_word(line, trigger, location)
        } else {
            find_symbol(line, trigger, location, guard)
        };
        if let Some((start, end)) = found {
            let replacement = replacements[0];
            let mutated_line = splice(line, start, end, replacement);
            return Some(make_mutant(
                lines,
                location,
                &mutated_line,
                operator,
                &line[start..end],
                replacement,
            ));
        }
    }
    None
}

fn is_word(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_alphanumeric())
}

fn in_window(index: usize, location: &CodeLocation) -> bool {
    index >= location.column && index < location.column + location.length
}

/// First occurrence of a keyword token within the location window, matched
/// case-insensitively at word boundaries.
fn find_word(line: &str, token: &str, location: &CodeLocation) -> Option<(usize, usize)> {
    let pattern = WORD_PATTERNS.get(token)?;
    pattern
        .find_iter(line)
        .find(|m| in_window(m.start(), location))
        .map(|m| (m.start(), m.end()))
}

/// First occurrence of a symbol token within the location window that is not
/// embedded in a larger operator token.
fn find_symbol(
    line: &str,
    token: &str,
    location: &CodeLocation,
    guard: &str,
) -> Option<(usize, usize)> {
    for (index, _) in line.match_indices(token) {
        if !in_window(index, location) {
            continue;
        }
        let before = line[..index].chars().next_back();
        let after = line[index + token.len()..].chars().next();
        if before.is_some_and(|c| guard.contains(c)) || after.is_some_and(|c| guard.contains(c)) {
            continue;
        }
        return Some((index, index + token.len()));
    }
    None
}

fn splice(line: &str, start: usize, end: usize, replacement: &str) -> String {
    format!("{}{}{}", &line[..start], replacement, &line[end..])
}

fn make_mutant(
    lines: &[&str],
    location: &CodeLocation,
    mutated_line: &str,
    operator: Operator,
    original: &str,
    mutated: &str,
) -> Mutant {
    let mut out = lines.to_vec();
    out[location.line] = mutated_line;
    Mutant {
        code: out.join("\n"),
        mutation: Mutation {
            operator: operator.code().to_string(),
            original: original.to_string(),
            mutated: mutated.to_string(),
            line: location.line,
        },
        location: *location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole_line(source: &str, line: usize) -> CodeLocation {
        let text = source.split('\n').nth(line).unwrap();
        CodeLocation {
            line,
            column: 0,
            length: text.len(),
        }
    }

    fn mutated_line(mutant: &Mutant) -> String {
        mutant
            .code
            .split('\n')
            .nth(mutant.location.line)
            .unwrap()
            .to_string()
    }

    #[test]
    fn aor_replaces_plus_with_minus() {
        let source = "Total := Amount + Fee;";
        let mutant = Operator::Aor.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "Total := Amount - Fee;");
        assert_eq!(mutant.mutation.operator, "AOR");
        assert_eq!(mutant.mutation.original, "+");
        assert_eq!(mutant.mutation.mutated, "-");
    }

    #[test]
    fn aor_matches_div_keyword_not_identifier() {
        let source = "Dividend := IndividualShare;";
        assert!(Operator::Aor
            .apply(source, &whole_line(source, 0))
            .is_none());

        let source = "Half := Total div 2;";
        let mutant = Operator::Aor.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "Half := Total mod 2;");
    }

    #[test]
    fn aor_skips_comment_markers() {
        // The '/' in '//' is part of the comment token, not a division.
        let source = "X := 1; // halve later";
        let mutant = Operator::Aor.apply(source, &whole_line(source, 0));
        assert!(mutant.is_none());
    }

    #[test]
    fn ror_prefers_most_specific_token() {
        let source = "if Amount >= Limit then";
        let mutant = Operator::Ror.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "if Amount > Limit then");
        assert_eq!(mutant.mutation.original, ">=");
    }

    #[test]
    fn ror_rotates_greater_than() {
        let source = "if A > B then";
        let mutant = Operator::Ror.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "if A >= B then");
    }

    #[test]
    fn ror_never_tears_assignment() {
        let source = "Counter := 1;";
        assert!(Operator::Ror
            .apply(source, &whole_line(source, 0))
            .is_none());
    }

    #[test]
    fn ror_flips_equality() {
        let source = "if Status = Status::Open then";
        let mutant = Operator::Ror.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.mutation.original, "=");
        assert_eq!(mutant.mutation.mutated, "<>");
        assert!(mutated_line(&mutant).starts_with("if Status <> Status"));
    }

    #[test]
    fn lcr_swaps_and_for_or() {
        let source = "if Posted and Released then";
        let mutant = Operator::Lcr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "if Posted or Released then");
    }

    #[test]
    fn lcr_removes_not() {
        let source = "if not Posted then";
        let mutant = Operator::Lcr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.mutation.mutated, "[removed]");
        assert_eq!(mutant.code, "if  Posted then");
    }

    #[test]
    fn lcr_respects_word_boundaries() {
        let source = "FormatAddress(Origin);";
        assert!(Operator::Lcr
            .apply(source, &whole_line(source, 0))
            .is_none());
    }

    #[test]
    fn sdl_deletes_plain_statement() {
        let source = "begin\n    Total += Fee;\nend;";
        let mutant = Operator::Sdl.apply(source, &whole_line(source, 1)).unwrap();
        assert_eq!(mutant.code, "begin\n\nend;");
        assert_eq!(mutant.mutation.original, "Total += Fee;");
        assert_eq!(mutant.mutation.mutated, "[deleted]");
    }

    #[test]
    fn sdl_refuses_guarded_lines() {
        let source = "var\n    Amount: Decimal;\nbegin\nend;\n";
        for (idx, guarded) in [(0, true), (2, true), (3, true), (4, true)] {
            let result = Operator::Sdl.apply(source, &whole_line(source, idx));
            assert_eq!(result.is_none(), guarded, "line {idx}");
        }
        // Mixed case delimiters are still delimiters.
        let source = "BEGIN";
        assert!(Operator::Sdl
            .apply(source, &whole_line(source, 0))
            .is_none());
    }

    #[test]
    fn rvr_flips_boolean_exit() {
        let source = "    exit(true);";
        let mutant = Operator::Rvr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "    exit(false);");
        assert_eq!(mutant.mutation.original, "exit(true)");
        assert_eq!(mutant.mutation.mutated, "exit(false)");
    }

    #[test]
    fn rvr_flips_numeric_and_empty_text_exits() {
        let source = "exit(0);";
        let mutant = Operator::Rvr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "exit(1);");

        let source = "exit('');";
        let mutant = Operator::Rvr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "exit('MUTATED');");
    }

    #[test]
    fn rvr_ignores_unrecognized_arguments() {
        let source = "exit(Total);";
        assert!(Operator::Rvr
            .apply(source, &whole_line(source, 0))
            .is_none());
        let source = "ExitCode := 1;";
        assert!(Operator::Rvr
            .apply(source, &whole_line(source, 0))
            .is_none());
    }

    #[test]
    fn bvr_increments_first_integer_literal() {
        let source = "if Quantity > 10 then";
        let mutant = Operator::Bvr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "if Quantity > 11 then");
        assert_eq!(mutant.mutation.original, "10");
        assert_eq!(mutant.mutation.mutated, "11");
    }

    #[test]
    fn bvr_handles_zero() {
        let source = "exit(0);";
        let mutant = Operator::Bvr.apply(source, &whole_line(source, 0)).unwrap();
        assert_eq!(mutant.code, "exit(1);");
    }

    #[test]
    fn bvr_skips_digits_inside_identifiers() {
        let source = "Line2Total := Line2Total;";
        assert!(Operator::Bvr
            .apply(source, &whole_line(source, 0))
            .is_none());
    }

    #[test]
    fn mutants_differ_only_on_the_target_line() {
        let source = "procedure Add(A: Integer; B: Integer): Integer\nbegin\n    exit(A + B);\nend;";
        for operator in ALL_OPERATORS {
            if let Some(mutant) = operator.apply(source, &whole_line(source, 2)) {
                let original: Vec<&str> = source.split('\n').collect();
                let mutated: Vec<&str> = mutant.code.split('\n').collect();
                assert_eq!(original.len(), mutated.len());
                for (idx, (a, b)) in original.iter().zip(&mutated).enumerate() {
                    if idx != 2 {
                        assert_eq!(a, b, "{} touched line {idx}", operator.code());
                    }
                }
            }
        }
    }

    #[test]
    fn apply_is_deterministic() {
        let source = "if A > 1 then\n    exit(A + 1);";
        for operator in ALL_OPERATORS {
            let first = operator.apply(source, &whole_line(source, 1));
            let second = operator.apply(source, &whole_line(source, 1));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn out_of_range_line_yields_none() {
        let location = CodeLocation {
            line: 9,
            column: 0,
            length: 5,
        };
        assert!(Operator::Aor.apply("A + B", &location).is_none());
    }

    #[test]
    fn operator_codes_round_trip() {
        for operator in ALL_OPERATORS {
            assert_eq!(Operator::from_code(operator.code()), Some(operator));
            assert_eq!(
                Operator::from_code(&operator.code().to_lowercase()),
                Some(operator)
            );
        }
        assert_eq!(Operator::from_code("XYZ"), None);
    }
}

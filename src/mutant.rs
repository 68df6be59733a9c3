use serde::{Deserialize, Serialize};

/// A textual span within a source unit. `column` and `length` are byte
/// offsets into the line identified by `line` (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLocation {
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

/// Describes what a single mutation did, for reporting purposes only.
/// `mutated` is `"[deleted]"` for statement deletion and `"[removed]"` when
/// a token was elided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub operator: String,
    pub original: String,
    pub mutated: String,
    pub line: usize,
}

/// A single-line-altered copy of a source unit. Carries the full mutated
/// source text rather than a diff, so the test execution service always
/// receives a complete, runnable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutant {
    pub code: String,
    pub mutation: Mutation,
    pub location: CodeLocation,
}

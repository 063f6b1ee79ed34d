//! Aggregation (reduction) directives.

use std::fmt;

/// Reduction applied over the query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Min,
    Max,
    Avg,
    Sum,
    Count,
}

impl AggregationKind {
    pub const ALL: [AggregationKind; 5] = [
        AggregationKind::Min,
        AggregationKind::Max,
        AggregationKind::Avg,
        AggregationKind::Sum,
        AggregationKind::Count,
    ];

    /// WCPS function name.
    pub fn function_name(&self) -> &'static str {
        match self {
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::Avg => "avg",
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
        }
    }

    /// Parse a function name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.function_name() == name)
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function_name().to_uppercase())
    }
}

/// The single live aggregation of a query: its kind and optional scope.
///
/// Setting a new aggregation replaces both fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub kind: AggregationKind,
    pub condition: Option<String>,
}

impl Aggregation {
    pub fn new(kind: AggregationKind, condition: Option<String>) -> Self {
        Self { kind, condition }
    }
}

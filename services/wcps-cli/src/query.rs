//! Translation of command-line query options into builder calls.

use anyhow::{anyhow, Context, Result};
use wcps_client::QueryTransport;
use wcps_common::OutputFormat;
use wcps_query::{AggregationKind, QueryBuilder};

/// Query options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub variables: Vec<String>,
    /// `VAR=EXPR` pairs.
    pub subsets: Vec<String>,
    pub filter: Option<String>,
    pub aggregate: Option<String>,
    pub condition: Option<String>,
    pub transform: Option<String>,
    pub encode: Option<String>,
    pub encode_literal: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Split `VAR=EXPR` at the first `=`.
pub fn parse_subset_arg(arg: &str) -> Result<(&str, &str)> {
    let (name, expr) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("subset '{}' must have the form VAR=EXPR", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("subset '{}' has an empty variable name", arg));
    }
    Ok((name, expr.trim()))
}

impl QueryOptions {
    /// Apply every option to `builder`, in the order a caller would chain them.
    pub fn apply<T: QueryTransport + ?Sized>(
        &self,
        builder: &mut QueryBuilder<'_, T>,
    ) -> Result<()> {
        if self.variables.is_empty() {
            return Err(anyhow!("at least one --var is required"));
        }

        for declaration in &self.variables {
            builder
                .initialize_var(declaration)
                .with_context(|| format!("Invalid variable '{}'", declaration))?;
        }

        for arg in &self.subsets {
            let (name, expr) = parse_subset_arg(arg)?;
            builder
                .subset(name, expr)
                .with_context(|| format!("Invalid subset '{}'", arg))?;
        }

        if let Some(filter) = &self.filter {
            builder.filter(filter).context("Invalid --where condition")?;
        }

        if let Some(transform) = &self.transform {
            builder.transform_data(transform).context("Invalid --transform")?;
        }

        if let Some(encode) = &self.encode {
            builder.encode(encode).context("Invalid --encode")?;
        }
        if let Some(literal) = &self.encode_literal {
            builder.encode_literal(literal);
        }

        if let Some(format) = self.format {
            builder.set_format(format);
        }

        if let Some(name) = &self.aggregate {
            let kind = AggregationKind::from_name(name)
                .ok_or_else(|| anyhow!("unknown aggregation '{}'", name))?;
            builder
                .aggregate(kind, self.condition.as_deref())
                .context("Invalid aggregation condition")?;
        } else if self.condition.is_some() {
            return Err(anyhow!("--condition requires --aggregate"));
        }

        Ok(())
    }
}

//! Stateful, fluent WCPS query builder.
//!
//! Every mutator validates its input against the current state before writing
//! anything, so a failed call leaves the builder unchanged.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};
use wcps_client::{decode_values, Connection, QueryTransport};
use wcps_common::{OutputFormat, WcpsError, WcpsResult};

use crate::aggregation::{Aggregation, AggregationKind};
use crate::result::QueryResult;
use crate::variables::{
    canonical_name, extract_variable_names, normalize_whitespace, parse_declaration,
};

/// Longest slice of an error body kept in [`WcpsError::ServerStatus`].
const MAX_ERROR_BODY: usize = 2048;

/// A bound variable: its declaration, its name and an optional subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Raw declaration, e.g. `$c in (AvgLandTemp)`.
    pub declaration: String,
    /// `$`-prefixed name, e.g. `$c`.
    pub name: String,
    /// Subset expression injected as `name[subset]`.
    pub subset: Option<String>,
}

/// Final output expression of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// Validated expression over bound variables; subsets are injected.
    Expression(String),
    /// Pre-computed value emitted verbatim.
    Literal(String),
}

impl Encoding {
    pub fn as_str(&self) -> &str {
        match self {
            Encoding::Expression(expr) | Encoding::Literal(expr) => expr,
        }
    }
}

/// Builder accumulating the state of one WCPS query.
///
/// The builder borrows its transport, so one [`Connection`] can serve many
/// builders. [`QueryBuilder::execute`] resets the query state, which makes
/// the same builder reusable for the next, unrelated query.
///
/// # Example
///
/// ```
/// use wcps_client::Connection;
/// use wcps_common::OutputFormat;
/// use wcps_query::QueryBuilder;
///
/// let connection = Connection::new("https://ows.rasdaman.org/rasdaman/ows")?;
/// let mut query = QueryBuilder::new(&connection);
/// query
///     .initialize_var("$c in (AvgLandTemp)")?
///     .subset("$c", r#"ansi("2014-07")"#)?
///     .set_format(OutputFormat::Png);
///
/// assert_eq!(
///     query.to_query_text(),
///     "for $c in (AvgLandTemp)\nreturn \nencode($c[ansi(\"2014-07\")] , \"image/png\")"
/// );
/// # Ok::<(), wcps_common::WcpsError>(())
/// ```
pub struct QueryBuilder<'c, T: QueryTransport + ?Sized = Connection> {
    pub(crate) connection: &'c T,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) filter_condition: Option<String>,
    pub(crate) aggregation: Option<Aggregation>,
    pub(crate) transformation: Option<String>,
    pub(crate) encoding: Option<Encoding>,
    pub(crate) format: Option<OutputFormat>,
}

impl<T: QueryTransport + ?Sized> fmt::Debug for QueryBuilder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("bindings", &self.bindings)
            .field("filter_condition", &self.filter_condition)
            .field("aggregation", &self.aggregation)
            .field("transformation", &self.transformation)
            .field("encoding", &self.encoding)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<'c, T: QueryTransport + ?Sized> QueryBuilder<'c, T> {
    pub fn new(connection: &'c T) -> Self {
        Self {
            connection,
            bindings: Vec::new(),
            filter_condition: None,
            aggregation: None,
            transformation: None,
            encoding: None,
            format: None,
        }
    }

    // === Accessors ===

    pub fn connection(&self) -> &'c T {
        self.connection
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Raw declarations, in `for` clause order.
    pub fn variables(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.declaration.as_str()).collect()
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }

    /// Subsets, index-aligned with [`variable_names`](Self::variable_names).
    pub fn subsets(&self) -> Vec<Option<&str>> {
        self.bindings.iter().map(|b| b.subset.as_deref()).collect()
    }

    pub fn filter_condition(&self) -> Option<&str> {
        self.filter_condition.as_deref()
    }

    pub fn aggregation(&self) -> Option<AggregationKind> {
        self.aggregation.as_ref().map(|a| a.kind)
    }

    pub fn aggregation_condition(&self) -> Option<&str> {
        self.aggregation.as_ref().and_then(|a| a.condition.as_deref())
    }

    pub fn transformation(&self) -> Option<&str> {
        self.transformation.as_deref()
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format
    }

    /// True when no query state has been set.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
            && self.filter_condition.is_none()
            && self.aggregation.is_none()
            && self.transformation.is_none()
            && self.encoding.is_none()
            && self.format.is_none()
    }

    // === Variables ===

    /// Bind a variable from a declaration of the form `$name in (coverage)`.
    ///
    /// Binding a name twice is rejected with [`WcpsError::DuplicateVariable`].
    pub fn initialize_var(&mut self, declaration: &str) -> WcpsResult<&mut Self> {
        let name = parse_declaration(declaration)?;
        if self.position_of(&name).is_some() {
            return Err(WcpsError::DuplicateVariable(name));
        }

        debug!(variable = %name, declaration = %declaration, "Bound variable");
        self.bindings.push(Binding {
            declaration: declaration.to_string(),
            name,
            subset: None,
        });
        Ok(self)
    }

    /// Check that `expression` references at least one variable and only
    /// variables bound in this builder.
    pub fn ensure_variables_exist(&self, expression: &str) -> WcpsResult<()> {
        let normalized = normalize_whitespace(expression);
        let names = extract_variable_names(&normalized).ok_or(WcpsError::NoVariablesSpecified)?;

        let known: HashSet<&str> = self.bindings.iter().map(|b| b.name.as_str()).collect();
        let mut seen = HashSet::new();
        let unknown: Vec<String> = names
            .into_iter()
            .filter(|name| !known.contains(name.as_str()))
            .filter(|name| seen.insert(name.clone()))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(WcpsError::UnknownVariables(unknown))
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.name == name)
    }

    // === Subset and filter ===

    /// Attach a subset to a bound variable, replacing any previous subset.
    ///
    /// `var_name` may be given with or without its `$` prefix.
    pub fn subset(&mut self, var_name: &str, subset: &str) -> WcpsResult<&mut Self> {
        let name = canonical_name(var_name);
        let index = self
            .position_of(&name)
            .ok_or_else(|| WcpsError::NoSuchVariable(var_name.to_string()))?;

        debug!(variable = %name, subset = %subset, "Attached subset");
        self.bindings[index].subset = Some(subset.to_string());
        Ok(self)
    }

    /// Set the `where` clause. Last call wins.
    pub fn filter(&mut self, condition: &str) -> WcpsResult<&mut Self> {
        self.ensure_variables_exist(condition)?;
        self.filter_condition = Some(condition.to_string());
        Ok(self)
    }

    // === Output format ===

    pub fn set_format(&mut self, format: OutputFormat) -> &mut Self {
        self.format = Some(format);
        self
    }

    /// Set the output format by name (`CSV`, `PNG` or `JPEG`).
    pub fn set_format_str(&mut self, format: &str) -> WcpsResult<&mut Self> {
        let format = format.parse::<OutputFormat>()?;
        Ok(self.set_format(format))
    }

    // === Aggregation ===

    /// Replace the current aggregation, including its condition.
    pub fn aggregate(
        &mut self,
        kind: AggregationKind,
        condition: Option<&str>,
    ) -> WcpsResult<&mut Self> {
        if let Some(condition) = condition {
            self.ensure_variables_exist(condition)?;
        }

        if let Some(previous) = &self.aggregation {
            debug!(previous = %previous.kind, next = %kind, "Replacing aggregation");
        }
        self.aggregation = Some(Aggregation::new(kind, condition.map(str::to_string)));
        Ok(self)
    }

    pub fn min(&mut self, condition: Option<&str>) -> WcpsResult<&mut Self> {
        self.aggregate(AggregationKind::Min, condition)
    }

    pub fn max(&mut self, condition: Option<&str>) -> WcpsResult<&mut Self> {
        self.aggregate(AggregationKind::Max, condition)
    }

    pub fn avg(&mut self, condition: Option<&str>) -> WcpsResult<&mut Self> {
        self.aggregate(AggregationKind::Avg, condition)
    }

    pub fn sum(&mut self, condition: Option<&str>) -> WcpsResult<&mut Self> {
        self.aggregate(AggregationKind::Sum, condition)
    }

    pub fn count(&mut self, condition: Option<&str>) -> WcpsResult<&mut Self> {
        self.aggregate(AggregationKind::Count, condition)
    }

    // === Transformation and encoding ===

    /// Set a general expression over bound variables as the query result.
    pub fn transform_data(&mut self, operation: &str) -> WcpsResult<&mut Self> {
        self.ensure_variables_exist(operation)?;
        self.transformation = Some(operation.to_string());
        Ok(self)
    }

    /// Set the encoding expression. Takes precedence over a transformation.
    pub fn encode(&mut self, operation: &str) -> WcpsResult<&mut Self> {
        self.ensure_variables_exist(operation)?;
        self.encoding = Some(Encoding::Expression(operation.to_string()));
        Ok(self)
    }

    /// Set an already computed value as the encoding, emitted verbatim.
    pub fn encode_literal(&mut self, value: impl fmt::Display) -> &mut Self {
        self.encoding = Some(Encoding::Literal(value.to_string()));
        self
    }

    // === Lifecycle ===

    /// Clear all query state. The connection is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.bindings.clear();
        self.filter_condition = None;
        self.aggregation = None;
        self.transformation = None;
        self.encoding = None;
        self.format = None;
        self
    }

    /// Serialize, send and decode the query, then reset the builder.
    ///
    /// The builder is reset whether or not the round trip succeeds.
    /// CSV results and results without a format are decoded as numbers;
    /// PNG and JPEG results are returned as raw bytes.
    pub fn execute(&mut self) -> WcpsResult<QueryResult> {
        let query = self.to_query_text();
        let format = self.format;
        self.reset();

        info!(format = ?format, query_len = query.len(), "Executing WCPS query");
        let response = self.connection.send(&query)?;

        if !response.is_success() {
            let mut body = response.text_lossy();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(WcpsError::ServerStatus {
                status: response.status(),
                body,
            });
        }

        let result = match format {
            Some(format) if format.is_image() => QueryResult::Image(response.into_body()),
            _ => QueryResult::Values(decode_values(response.body())?),
        };

        debug!(len = result.len(), "Decoded WCPS result");
        Ok(result)
    }
}

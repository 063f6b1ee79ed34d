//! Serialization of builder state into WCPS query text.

use std::fmt;

use wcps_client::QueryTransport;

use crate::builder::{Encoding, QueryBuilder};
use crate::variables::replace_variable_tokens;

impl<T: QueryTransport + ?Sized> QueryBuilder<'_, T> {
    /// Build the query text from the current state.
    ///
    /// ```text
    /// for <declaration>\n...
    /// [where <condition>\n]
    /// return \n
    /// <agg>(<scoped-expr>) | encode(<expr>, "<mime>") | <expr>
    /// ```
    ///
    /// An aggregation suppresses the encoding, transformation and format.
    /// Otherwise the payload is the encoding, else the transformation, else
    /// all variables listed with their subsets.
    pub fn to_query_text(&self) -> String {
        self.to_string()
    }

    fn write_query<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("for ")?;
        for binding in &self.bindings {
            writeln!(out, "{}", binding.declaration)?;
        }

        if let Some(condition) = &self.filter_condition {
            writeln!(out, "where {}", condition)?;
        }
        out.write_str("return \n")?;

        if let Some(aggregation) = &self.aggregation {
            let argument = match &aggregation.condition {
                Some(condition) => self.replace_variables_with_subsets(condition),
                None => self.variables_with_subsets(),
            };
            return write!(out, "{}({})", aggregation.kind.function_name(), argument);
        }

        let payload = match (&self.encoding, &self.transformation) {
            (Some(Encoding::Expression(expr)), _) => self.replace_variables_with_subsets(expr),
            (Some(Encoding::Literal(value)), _) => value.clone(),
            (None, Some(transformation)) => self.replace_variables_with_subsets(transformation),
            (None, None) => self.variables_with_subsets(),
        };

        match self.format {
            Some(format) => write!(out, "encode({}, \"{}\")", payload, format.mime_type()),
            None => out.write_str(&payload),
        }
    }

    /// Replace each subsetted variable in `expression` with `name[subset]`.
    pub fn replace_variables_with_subsets(&self, expression: &str) -> String {
        replace_variable_tokens(expression, |token| {
            self.bindings
                .iter()
                .find(|b| b.name == token)
                .and_then(|b| b.subset.as_ref())
                .map(|subset| format!("{}[{}]", token, subset))
        })
    }

    /// All variables in binding order; a subsetted one renders as
    /// `name[subset] ` including the trailing space.
    fn variables_with_subsets(&self) -> String {
        let mut expression = String::new();
        for binding in &self.bindings {
            if !expression.is_empty() && !expression.ends_with(' ') {
                expression.push(' ');
            }
            expression.push_str(&binding.name);
            if let Some(subset) = &binding.subset {
                expression.push_str(&format!("[{}] ", subset));
            }
        }
        expression
    }
}

impl<T: QueryTransport + ?Sized> fmt::Display for QueryBuilder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_query(f)
    }
}

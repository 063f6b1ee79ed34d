//! Fluent builder for WCPS (Web Coverage Processing Service) queries.
//!
//! A [`QueryBuilder`] accumulates variable bindings, subsets, a filter, an
//! aggregation or transformation, an encoding and an output format, then
//! serializes them into a single WCPS query and executes it through a
//! [`wcps_client::QueryTransport`].
//!
//! # Example
//!
//! ```no_run
//! use wcps_client::Connection;
//! use wcps_query::QueryBuilder;
//!
//! let connection = Connection::new("https://ows.rasdaman.org/rasdaman/ows")?;
//! let mut query = QueryBuilder::new(&connection);
//! query
//!     .initialize_var("$c in (AvgLandTemp)")?
//!     .subset("$c", r#"Lat(53.08), Long(8.80), ansi("2014-01":"2014-12")"#)?
//!     .avg(None)?;
//!
//! let average = query.execute()?;
//! # Ok::<(), wcps_common::WcpsError>(())
//! ```

pub mod aggregation;
pub mod builder;
pub mod render;
pub mod result;
pub mod variables;

pub use aggregation::{Aggregation, AggregationKind};
pub use builder::{Binding, Encoding, QueryBuilder};
pub use result::QueryResult;
pub use variables::{extract_variable_names, NAME_DELIMITERS};

pub use wcps_common::{OutputFormat, WcpsError, WcpsResult};

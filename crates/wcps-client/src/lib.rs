//! Client side of a WCPS (Web Coverage Processing Service) deployment.
//!
//! A [`Connection`] holds a server endpoint and submits query text as a single
//! blocking form-encoded POST. Anything able to submit query text implements
//! [`QueryTransport`], which is the seam the query builder executes through.
//!
//! # Example
//!
//! ```no_run
//! use wcps_client::{decode_values, Connection, QueryTransport};
//!
//! let connection = Connection::new("https://ows.rasdaman.org/rasdaman/ows")?;
//! let response = connection.send("for $c in (AvgLandTemp) return 1")?;
//! let values = decode_values(response.body())?;
//! # Ok::<(), wcps_common::WcpsError>(())
//! ```

pub mod config;
pub mod connection;
pub mod decode;
pub mod response;

pub use config::ConnectionConfig;
pub use connection::{Connection, QueryTransport};
pub use decode::decode_values;
pub use response::WcpsResponse;

/// Name of the form field carrying the query text.
pub const QUERY_FIELD: &str = "query";

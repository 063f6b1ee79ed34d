//! Decoded query results.

use bytes::Bytes;

/// Result of executing a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Numeric values from a CSV (or unformatted) response.
    Values(Vec<f64>),
    /// Raw PNG or JPEG payload.
    Image(Bytes),
}

impl QueryResult {
    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            QueryResult::Values(values) => Some(values.as_slice()),
            QueryResult::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            QueryResult::Image(bytes) => Some(&bytes[..]),
            QueryResult::Values(_) => None,
        }
    }

    pub fn into_values(self) -> Option<Vec<f64>> {
        match self {
            QueryResult::Values(values) => Some(values),
            QueryResult::Image(_) => None,
        }
    }

    /// Number of values, or number of bytes for an image.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Values(values) => values.len(),
            QueryResult::Image(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Decoding of numeric (CSV) payloads.

use wcps_common::{WcpsError, WcpsResult};

/// Convert a comma-separated byte string into a list of floats.
///
/// Whitespace around each item is ignored, so `b"1.0, 2.0\n"` decodes to
/// `[1.0, 2.0]`. An empty payload or a non-numeric item is a decode error.
pub fn decode_values(payload: &[u8]) -> WcpsResult<Vec<f64>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| WcpsError::Decode(format!("payload is not UTF-8: {}", e)))?;

    if text.trim().is_empty() {
        return Err(WcpsError::Decode("payload is empty".to_string()));
    }

    text.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f64>()
                .map_err(|_| WcpsError::Decode(format!("'{}' is not a number", item)))
        })
        .collect()
}

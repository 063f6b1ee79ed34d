//! Output encodings understood by the query builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WcpsError;

/// Output format of a query result.
///
/// Controls both the `encode(..., "<mime>")` wrapper emitted in the query text
/// and how the response payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    Csv,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// MIME type used in the encode wrapper.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// Whether the payload is an opaque image rather than numbers.
    pub fn is_image(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Jpeg)
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = WcpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CSV" => Ok(OutputFormat::Csv),
            "PNG" => Ok(OutputFormat::Png),
            "JPEG" => Ok(OutputFormat::Jpeg),
            _ => Err(WcpsError::UnsupportedFormat(s.to_string())),
        }
    }
}

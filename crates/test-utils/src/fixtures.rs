//! Common test fixtures for WCPS query tests.
//!
//! Coverage names match the demo coverages served by the public rasdaman
//! endpoint, so the same strings can be pasted into a live session.

/// Variable declarations.
pub mod declarations {
    /// Monthly average land temperature.
    pub const AVG_LAND_TEMP: &str = "$c in (AvgLandTemp)";

    /// A second binding for multi-variable queries.
    pub const AVG_LAND_TEMP_D: &str = "$d in (AvgLandTemp)";

    /// Name whose prefix is another variable name (`$c`).
    pub const PREFIX_CLASH: &str = "$c2 in (AvgLandTemp)";

    /// Declarations that must be rejected.
    pub const MALFORMED: &[&str] = &[
        "$cin(AvgLandTemp)",
        "$c in AvgLandTemp",
        "$c in (AvgLandTemp",
        "c in (AvgLandTemp)",
        "",
    ];
}

/// Subset expressions.
pub mod subsets {
    /// A single month.
    pub const JULY_2014: &str = r#"ansi("2014-07")"#;

    /// Bremen, one year.
    pub const BREMEN_2014: &str = r#"Lat(53.08), Long(8.80), ansi("2014-01":"2014-12")"#;
}

/// Response payloads.
pub mod payloads {
    /// Minimal sanity-check body.
    pub const ONE: &[u8] = b"1";

    /// Twelve monthly temperatures.
    pub const BREMEN_2014_CSV: &[u8] =
        b"1.2,2.1,5.3,9.8,13.4,16.7,18.9,18.2,14.6,10.1,5.4,2.3";

    /// Expected decoding of [`BREMEN_2014_CSV`].
    pub const BREMEN_2014_VALUES: [f64; 12] = [
        1.2, 2.1, 5.3, 9.8, 13.4, 16.7, 18.9, 18.2, 14.6, 10.1, 5.4, 2.3,
    ];

    /// PNG file signature followed by a truncated header.
    pub const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13];

    /// Typical OGC exception body.
    pub const EXCEPTION_REPORT: &[u8] =
        b"<ows:ExceptionReport><ows:Exception exceptionCode=\"WcpsError\"/></ows:ExceptionReport>";
}

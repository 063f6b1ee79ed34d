//! Serialized query text for complete builder configurations.

use test_utils::fixtures::{declarations, subsets};
use wcps_client::Connection;
use wcps_common::{ErrorKind, OutputFormat};
use wcps_query::{AggregationKind, QueryBuilder};

fn connection() -> Connection {
    Connection::new("http://localhost:8080/rasdaman/ows").unwrap()
}

// ============================================================================
// Encoding and format
// ============================================================================

#[test]
fn test_subset_with_png_format() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .set_format(OutputFormat::Png);

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\nreturn \nencode($c[ansi(\"2014-07\")] , \"image/png\")"
    );
}

#[test]
fn test_literal_encoding_without_format() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .encode_literal(200 + 100);

    assert_eq!(query.to_query_text(), "for $c in (AvgLandTemp)\nreturn \n300");
}

#[test]
fn test_encoding_takes_precedence_over_transformation() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .transform_data("$c + 200")
        .unwrap()
        .encode_literal(300);

    assert_eq!(query.to_query_text(), "for $c in (AvgLandTemp)\nreturn \n300");
}

#[test]
fn test_encode_expression_with_subset_and_format() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .transform_data("$c + 200")
        .unwrap()
        .encode(
            "switch case $c > 30 return {red: 255; green: 0; blue: 0} \
             default return {red: 0; green: 0; blue: 255}",
        )
        .unwrap()
        .set_format(OutputFormat::Jpeg);

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\nreturn \nencode(switch case $c[ansi(\"2014-07\")] > 30 \
         return {red: 255; green: 0; blue: 0} default return {red: 0; green: 0; blue: 255}, \
         \"image/jpeg\")"
    );
}

#[test]
fn test_transformation_with_filter_and_csv() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::BREMEN_2014)
        .unwrap()
        .filter("$c > 0")
        .unwrap()
        .transform_data("abs($c - 3.6 * $c)")
        .unwrap()
        .set_format(OutputFormat::Csv);

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\nwhere $c > 0\nreturn \n\
         encode(abs($c[Lat(53.08), Long(8.80), ansi(\"2014-01\":\"2014-12\")] - 3.6 * \
         $c[Lat(53.08), Long(8.80), ansi(\"2014-01\":\"2014-12\")]), \"text/csv\")"
    );
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_aggregation_without_condition() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .max(None)
        .unwrap();

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\nreturn \nmax($c[ansi(\"2014-07\")] )"
    );
}

#[test]
fn test_aggregation_with_condition() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .count(Some("$c > 20"))
        .unwrap();

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\nreturn \ncount($c[ansi(\"2014-07\")] > 20)"
    );
}

#[test]
fn test_aggregation_suppresses_encoding_and_format() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .transform_data("$c * 2")
        .unwrap()
        .encode("$c + 1")
        .unwrap()
        .set_format(OutputFormat::Png)
        .sum(Some("$c"))
        .unwrap();

    let text = query.to_query_text();
    assert_eq!(text, "for $c in (AvgLandTemp)\nreturn \nsum($c)");
    assert!(!text.contains("encode"));
}

#[test]
fn test_only_last_aggregation_is_emitted() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .max(Some("$c > 12"))
        .unwrap()
        .avg(None)
        .unwrap();

    assert_eq!(query.aggregation(), Some(AggregationKind::Avg));
    assert_eq!(query.aggregation_condition(), None);
    assert_eq!(query.to_query_text(), "for $c in (AvgLandTemp)\nreturn \navg($c)");
}

// ============================================================================
// Multiple variables
// ============================================================================

#[test]
fn test_prefix_variable_not_substituted() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .initialize_var(declarations::PREFIX_CLASH)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .transform_data("$c2 - $c")
        .unwrap();

    assert_eq!(
        query.to_query_text(),
        "for $c in (AvgLandTemp)\n$c2 in (AvgLandTemp)\nreturn \n$c2 - $c[ansi(\"2014-07\")]"
    );
}

#[test]
fn test_two_subsetted_variables() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query
        .initialize_var(declarations::AVG_LAND_TEMP)
        .unwrap()
        .initialize_var(declarations::AVG_LAND_TEMP_D)
        .unwrap()
        .subset("$c", subsets::JULY_2014)
        .unwrap()
        .subset("d", "ansi(\"2015-07\")")
        .unwrap()
        .transform_data("$d - $c")
        .unwrap();

    assert!(query
        .to_query_text()
        .ends_with("return \n$d[ansi(\"2015-07\")] - $c[ansi(\"2014-07\")]"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_malformed_declarations() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    for declaration in declarations::MALFORMED {
        let err = query.initialize_var(declaration).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "declaration {:?}", declaration);
    }
    assert!(query.is_empty());
}

#[test]
fn test_unknown_variables_rejected_everywhere() {
    let connection = connection();
    let mut query = QueryBuilder::new(&connection);
    query.initialize_var(declarations::AVG_LAND_TEMP).unwrap();

    assert_eq!(query.filter("$t > 10").unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(query.min(Some("$t < 10001")).unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(query.transform_data("$t - 1").unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(query.encode("$t > 12").unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(query.subset("$t", subsets::JULY_2014).unwrap_err().kind(), ErrorKind::Value);

    assert_eq!(query.to_query_text(), "for $c in (AvgLandTemp)\nreturn \n$c");
}

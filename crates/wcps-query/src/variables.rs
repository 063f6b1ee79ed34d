//! Variable name extraction and subset injection.
//!
//! A variable is a `$`-prefixed token. The token runs from the `$` up to the
//! first name delimiter or the end of the text; the `$` is part of the name.

use std::ops::Range;

use wcps_common::{WcpsError, WcpsResult};

/// Characters that terminate a variable name.
pub const NAME_DELIMITERS: [char; 19] = [
    ' ', ',', '(', ')', '[', ']', '{', '}', ';', '>', '<', '+', '-', '=', '.', '/', '\\', '|', '!',
];

const DECLARATION_SEPARATOR: &str = " in (";

fn is_name_delimiter(c: char) -> bool {
    NAME_DELIMITERS.contains(&c)
}

/// Delimiters plus the whitespace that validation folds into spaces.
fn is_token_boundary(c: char) -> bool {
    is_name_delimiter(c) || matches!(c, '\n' | '\r' | '\t')
}

/// Byte ranges of every `$` token, left to right.
///
/// Scanning resumes after the end of the previous token, so a `$` inside a
/// token never starts a new one.
fn token_spans(text: &str, is_boundary: fn(char) -> bool) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut index = 0;

    while let Some(offset) = text[index..].find('$') {
        let start = index + offset;
        let end = text[start..]
            .char_indices()
            .find(|&(_, c)| is_boundary(c))
            .map(|(i, _)| start + i)
            .unwrap_or(text.len());

        spans.push(start..end);
        index = end;
    }

    spans
}

/// Extract all variable names from `text`, in order and with duplicates.
///
/// Returns `None` when the text contains no `$` at all.
///
/// ```
/// use wcps_query::variables::extract_variable_names;
///
/// assert_eq!(
///     extract_variable_names("$a>15 and $b"),
///     Some(vec!["$a".to_string(), "$b".to_string()])
/// );
/// assert_eq!(extract_variable_names("200 - 100"), None);
/// ```
pub fn extract_variable_names(text: &str) -> Option<Vec<String>> {
    let names: Vec<String> = token_spans(text, is_name_delimiter)
        .into_iter()
        .map(|span| text[span].to_string())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// Fold newlines, carriage returns and tabs into plain spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace(['\n', '\r', '\t'], " ")
}

/// Check a declaration of the shape `$name in (coverage)` and return `$name`.
pub fn parse_declaration(declaration: &str) -> WcpsResult<String> {
    if !declaration.starts_with('$') {
        return Err(WcpsError::MalformedDeclaration(format!(
            "'{}' must start with '$'",
            declaration
        )));
    }
    if !declaration.contains(DECLARATION_SEPARATOR) {
        return Err(WcpsError::MalformedDeclaration(format!(
            "'{}' must contain '{}'",
            declaration, DECLARATION_SEPARATOR
        )));
    }
    if !declaration.ends_with(')') {
        return Err(WcpsError::MalformedDeclaration(format!(
            "'{}' must end with ')'",
            declaration
        )));
    }

    let name = extract_variable_names(declaration)
        .and_then(|names| names.into_iter().next())
        .filter(|name| name.len() > 1)
        .ok_or_else(|| {
            WcpsError::MalformedDeclaration(format!("'{}' has no variable name", declaration))
        })?;

    Ok(name)
}

/// Prefix a bare name with `$`; `$`-prefixed names pass through.
pub fn canonical_name(name: &str) -> String {
    if name.starts_with('$') {
        name.to_string()
    } else {
        format!("${}", name)
    }
}

/// Rewrite every whole `$` token for which `replace` returns a value.
///
/// Matching is by exact token, so `$c` does not touch `$c2`.
pub fn replace_variable_tokens<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for span in token_spans(text, is_token_boundary) {
        out.push_str(&text[last..span.start]);
        let token = &text[span.clone()];
        match replace(token) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(token),
        }
        last = span.end;
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        extract_variable_names(text).unwrap_or_default()
    }

    #[test]
    fn test_extract_single() {
        assert_eq!(names("$c"), vec!["$c"]);
        assert_eq!(names("abs($c - 1000)"), vec!["$c"]);
    }

    #[test]
    fn test_extract_each_delimiter() {
        for delimiter in NAME_DELIMITERS {
            let text = format!("$a{}$b", delimiter);
            assert_eq!(names(&text), vec!["$a", "$b"], "delimiter {:?}", delimiter);
        }
    }

    #[test]
    fn test_extract_preserves_order_and_duplicates() {
        assert_eq!(names("$b + $a * $b"), vec!["$b", "$a", "$b"]);
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_variable_names("200 - 100"), None);
        assert_eq!(extract_variable_names(""), None);
    }

    #[test]
    fn test_dollar_inside_token_is_not_a_new_match() {
        assert_eq!(names("$a$b > 1"), vec!["$a$b"]);
    }

    #[test]
    fn test_newline_is_not_a_name_delimiter() {
        assert_eq!(names("$a\n$b"), vec!["$a\n$b"]);
        assert_eq!(names(&normalize_whitespace("$a\n$b\t$c\r")), vec!["$a", "$b", "$c"]);
    }

    #[test]
    fn test_extract_non_ascii_neighbours() {
        assert_eq!(names("é$temp°x"), vec!["$temp°x"]);
        assert_eq!(names("$α>1"), vec!["$α"]);
    }

    #[test]
    fn test_parse_declaration() {
        assert_eq!(parse_declaration("$c in (AvgLandTemp)").unwrap(), "$c");
        assert_eq!(parse_declaration("$cov2 in (S2_L2A, mean_summer)").unwrap(), "$cov2");
    }

    #[test]
    fn test_parse_declaration_malformed() {
        for declaration in [
            "$cin(AvgLandTemp)",
            "$c in AvgLandTemp",
            "$c in (AvgLandTemp",
            "c in (AvgLandTemp)",
            "$ in (AvgLandTemp)",
            "",
        ] {
            assert!(
                matches!(
                    parse_declaration(declaration),
                    Err(WcpsError::MalformedDeclaration(_))
                ),
                "declaration {:?}",
                declaration
            );
        }
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("c"), "$c");
        assert_eq!(canonical_name("$c"), "$c");
    }

    #[test]
    fn test_replace_whole_tokens_only() {
        let out = replace_variable_tokens("$c + $c2 - $c", |token| {
            (token == "$c").then(|| "$c[x]".to_string())
        });
        assert_eq!(out, "$c[x] + $c2 - $c[x]");
    }

    #[test]
    fn test_replace_across_whitespace_boundaries() {
        let out = replace_variable_tokens("case $c\nreturn\t$c", |token| {
            (token == "$c").then(|| "$c[t]".to_string())
        });
        assert_eq!(out, "case $c[t]\nreturn\t$c[t]");
    }

    #[test]
    fn test_replace_keeps_text_without_tokens() {
        assert_eq!(replace_variable_tokens("300", |_| Some("x".to_string())), "300");
    }
}

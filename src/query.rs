use crate::error::SearchError;

/// Minimum query length after cleanup. Single characters match half
/// the catalog and are almost always typos.
const MIN_QUERY_LEN: usize = 2;

/// Clean a raw query for use as a URL search parameter: trim, drop
/// control characters, collapse runs of whitespace to single spaces.
/// Empty (or too-short) results are rejected before any network call.
pub fn normalize(raw: &str) -> Result<String, SearchError> {
    let cleaned = raw
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        return Err(SearchError::InvalidQuery(
            "query must not be empty".to_string(),
        ));
    }
    if cleaned.chars().count() < MIN_QUERY_LEN {
        return Err(SearchError::InvalidQuery(format!(
            "query must be at least {MIN_QUERY_LEN} characters long"
        )));
    }
    Ok(cleaned)
}

/// Case-insensitive fuzzy match of a normalized query against a
/// product name: whole-query substring first, then token overlap in
/// either direction. Tokens are alphanumeric runs of length >= 2, so
/// "NUC 1360P" still matches "NUC BOX-1360P/D4".
pub fn matches_name(name: &str, query: &str) -> bool {
    let name = name.to_lowercase();
    let query = query.to_lowercase();

    if name.contains(&query) {
        return true;
    }

    tokenize(&query).iter().any(|qt| name.contains(qt.as_str()))
        || tokenize(&name).iter().any(|nt| query.contains(nt.as_str()))
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn test_normalize_cleanup() {
    assert_eq!(normalize("  SBC-230  ").unwrap(), "SBC-230");
    assert_eq!(normalize("embedded\t\n system").unwrap(), "embedded system");
    assert_eq!(normalize("iEPF-\u{7}9010S").unwrap(), "iEPF-9010S");
}

#[test]
fn test_normalize_rejects_empty_and_short() {
    assert!(matches!(normalize(""), Err(SearchError::InvalidQuery(_))));
    assert!(matches!(
        normalize("   \t\n  "),
        Err(SearchError::InvalidQuery(_))
    ));
    assert!(matches!(normalize("x"), Err(SearchError::InvalidQuery(_))));
}

#[test]
fn test_matches_name() {
    assert!(matches_name("SBC-230 Industrial Board", "sbc-230"));
    assert!(matches_name("NUC BOX-1360P/D4", "1360P"));
    // token overlap in either direction
    assert!(matches_name("IMB-1714", "IMB series motherboard"));
    assert!(!matches_name("4X4 BOX-5000", "SBC-230"));
}

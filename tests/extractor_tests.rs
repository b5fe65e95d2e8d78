use reqwest::Url;

use asrockind_mcp::error::SearchError;
use asrockind_mcp::extractor;

const SEARCH_RESULTS: &str = include_str!("fixtures/search_results.html");
const NO_RESULTS: &str = include_str!("fixtures/no_results.html");
const PRODUCT_SBC230: &str = include_str!("fixtures/product_sbc230.html");
const PRODUCT_NO_SPECS: &str = include_str!("fixtures/product_no_specs.html");

fn base_url() -> Url {
    Url::parse("https://www.asrockind.com").unwrap()
}

#[test]
fn product_links_preserve_site_order() {
    let links = extractor::product_links(SEARCH_RESULTS, &base_url()).unwrap();
    assert_eq!(links.len(), 4);

    let names: Vec<&str> = links.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "SBC-230 Industrial Single Board Computer",
            "SBC-231",
            "IMB-1714",
            // last anchor has no title div; name falls back to the slug
            "nuc-box-1360p",
        ]
    );
}

#[test]
fn product_links_resolve_against_base() {
    let links = extractor::product_links(SEARCH_RESULTS, &base_url()).unwrap();
    assert_eq!(links[0].url, "https://www.asrockind.com/en-gb/product/sbc-230");
    assert!(links.iter().all(|l| l.url.starts_with("https://www.asrockind.com/")));
}

#[test]
fn sbc_230_query_matches_a_result() {
    let links = extractor::product_links(SEARCH_RESULTS, &base_url()).unwrap();
    assert!(
        links.iter().any(|l| l.name.contains("SBC-230")),
        "expected a product named SBC-230 in {links:?}"
    );
}

#[test]
fn no_result_marker_is_no_results() {
    let err = extractor::product_links(NO_RESULTS, &base_url()).unwrap_err();
    assert!(matches!(err, SearchError::NoResults), "got {err:?}");
}

#[test]
fn unrecognized_page_is_a_parse_error() {
    let err = extractor::product_links("<html><body><p>504</p></body></html>", &base_url())
        .unwrap_err();
    assert!(matches!(err, SearchError::Parse(_)), "got {err:?}");
}

#[test]
fn specifications_keyed_by_category() {
    let specs = extractor::specifications(PRODUCT_SBC230);

    assert_eq!(specs.get("CPU - Processor").map(String::as_str), Some("Intel Atom x5-E3940"));
    assert_eq!(specs.get("CPU - Cores").map(String::as_str), Some("4"));
    assert_eq!(specs.get("Memory - Type").map(String::as_str), Some("DDR3L 1866MHz"));
    // same label under a different heading stays a distinct key
    assert_eq!(specs.get("Expansion - Type").map(String::as_str), Some("1 x M.2 Key E"));
}

#[test]
fn specifications_skip_header_and_partial_rows() {
    let specs = extractor::specifications(PRODUCT_SBC230);

    assert!(!specs.keys().any(|k| k.ends_with("Specification")), "{specs:?}");
    assert!(!specs.values().any(|v| v == "unlabeled value dropped"));
    assert!(!specs.keys().any(|k| k.contains("colspan")));
    assert_eq!(specs.len(), 6);
}

#[test]
fn section_h3_beats_an_intervening_h2_banner() {
    // An h2 banner between a section's h3 and its table must not
    // steal the category; h3 wins, then h2, then h4.
    let html = r#"<html><body>
        <h3 class="title-sub">CPU</h3>
        <h2>Specification</h2>
        <table class="table-spec">
          <tr><td>Processor</td><td>Intel Atom x5-E3940</td></tr>
        </table>
        <h2>Ordering</h2>
        <table class="table-spec">
          <tr><td>Part No.</td><td>SBC-230-A1</td></tr>
        </table>
    </body></html>"#;
    let specs = asrockind_mcp::extractor::specifications(html);

    assert_eq!(
        specs.get("CPU - Processor").map(String::as_str),
        Some("Intel Atom x5-E3940")
    );
    // still CPU: no h3 has appeared since, and h3 outranks the h2
    assert_eq!(
        specs.get("CPU - Part No.").map(String::as_str),
        Some("SBC-230-A1")
    );
}

#[test]
fn h2_is_the_category_when_no_h3_precedes() {
    let html = r#"<html><body>
        <h2>General</h2>
        <table class="product-spec">
          <tr><td>Form Factor</td><td>3.5" SBC</td></tr>
        </table>
    </body></html>"#;
    let specs = asrockind_mcp::extractor::specifications(html);

    assert_eq!(
        specs.get("General - Form Factor").map(String::as_str),
        Some("3.5\" SBC")
    );
}

#[test]
fn page_without_spec_tables_falls_back_to_description() {
    let specs = extractor::specifications(PRODUCT_NO_SPECS);
    assert_eq!(specs.len(), 1);

    let desc = specs.get("Description").expect("Description entry");
    assert!(desc.starts_with("Robust Edge Computer"));
    // whitespace collapsed to single spaces
    assert!(desc.contains("flexible I/O, designed for harsh"));
}

#[test]
fn long_description_is_truncated() {
    let blurb = "x".repeat(800);
    let html = format!("<html><body><div class=\"description\">{blurb}</div></body></html>");
    let specs = extractor::specifications(&html);

    let desc = specs.get("Description").unwrap();
    assert_eq!(desc.chars().count(), 503); // 500 chars + "..."
    assert!(desc.ends_with("..."));
}

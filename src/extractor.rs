//! Pure HTML -> structured-record extraction, isolated from the HTTP
//! transport so it can be unit tested against saved pages.

use std::collections::BTreeMap;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::data_models::ProductLink;
use crate::error::SearchError;

/// Rows whose first cell is one of these are table headers, not specs.
const HEADER_CELLS: [&str; 2] = ["specification", "feature"];

const DESCRIPTION_MAX_CHARS: usize = 500;

/// Pull candidate product links off a search results page, in the
/// site's presentation order.
///
/// The site renders an explicit `div.no-result` marker for empty
/// searches; that maps to `NoResults`. A page with neither marker nor
/// product anchors is a shape we don't recognize.
pub fn product_links(html: &str, base_url: &Url) -> Result<Vec<ProductLink>, SearchError> {
    let document = Html::parse_document(html);
    let no_result = Selector::parse("div.no-result").unwrap();
    let link_sel = Selector::parse("a.whole-link.d-block").unwrap();
    let title_sel = Selector::parse("div.product-title").unwrap();

    if document.select(&no_result).next().is_some() {
        return Err(SearchError::NoResults);
    }

    let mut links = Vec::new();
    for anchor in document.select(&link_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(url) = base_url.join(href) else {
            tracing::warn!("skipping unresolvable product href: {href:?}");
            continue;
        };

        let name = anchor
            .select(&title_sel)
            .next()
            .map(collapse_text)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| last_path_segment(&url));

        links.push(ProductLink {
            name,
            url: url.to_string(),
        });
    }

    if links.is_empty() {
        return Err(SearchError::Parse(
            "search page has neither product links nor a no-result marker".to_string(),
        ));
    }
    Ok(links)
}

/// Flatten a product detail page's spec tables into label -> value.
///
/// Walks the document in order, remembering the most recent h3, h2,
/// and h4 headings; rows of any table whose class mentions "spec" get
/// keyed as "{heading} - {label}", preferring the nearest preceding
/// h3, then h2, then h4. Duplicate labels overwrite.
/// Pages without spec tables fall back to a single "Description"
/// entry from the product blurb, when one exists.
pub fn specifications(html: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();

    let mut specs = BTreeMap::new();
    let mut last_h3: Option<String> = None;
    let mut last_h2: Option<String> = None;
    let mut last_h4: Option<String> = None;

    for node in document.root_element().descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        match el.value().name() {
            "h3" => last_h3 = Some(collapse_text(el)),
            "h2" => last_h2 = Some(collapse_text(el)),
            "h4" => last_h4 = Some(collapse_text(el)),
            "table" if el.value().classes().any(|c| c.contains("spec")) => {
                let category = last_h3
                    .clone()
                    .or_else(|| last_h2.clone())
                    .or_else(|| last_h4.clone())
                    .unwrap_or_default();
                for row in el.select(&row_sel) {
                    let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
                    if cells.len() < 2 {
                        continue;
                    }
                    let key = collapse_text(cells[0]);
                    let value = collapse_text(cells[1]);
                    if key.is_empty() || value.is_empty() {
                        continue;
                    }
                    if HEADER_CELLS.contains(&key.to_lowercase().as_str()) {
                        continue;
                    }
                    let full_key = if category.is_empty() {
                        key
                    } else {
                        format!("{category} - {key}")
                    };
                    specs.insert(full_key, value);
                }
            }
            _ => {}
        }
    }

    if specs.is_empty() {
        if let Some(desc) = description_fallback(&document) {
            specs.insert("Description".to_string(), desc);
        }
    }
    specs
}

/// Some product pages carry no spec table at all; a trimmed slice of
/// the marketing blurb is better than an empty mapping.
fn description_fallback(document: &Html) -> Option<String> {
    let desc_sel = Selector::parse(".product-desc, .overview, .description").unwrap();
    for el in document.select(&desc_sel) {
        let text = collapse_text(el);
        if text.chars().count() > 10 {
            if text.chars().count() > DESCRIPTION_MAX_CHARS {
                let truncated: String = text.chars().take(DESCRIPTION_MAX_CHARS).collect();
                return Some(format!("{truncated}..."));
            }
            return Some(text);
        }
    }
    None
}

/// All text under an element, whitespace-collapsed to single spaces.
fn collapse_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name fallback when an anchor has no title element: the last
/// nonempty path segment of its URL.
fn last_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown-product")
        .to_string()
}

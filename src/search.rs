use std::time::Duration;

use reqwest::Url;

use crate::config::CONFIG;
use crate::data_models::{ProductInfo, ProductLink, SearchResponse};
use crate::error::SearchError;
use crate::extractor;
use crate::fetcher::Fetcher;
use crate::query;

/// End-to-end search pipeline: normalize -> search page -> candidate
/// links -> bounded sequential detail fetches -> assembled response.
pub struct ProductSearcher {
    fetcher: Fetcher,
}

impl ProductSearcher {
    pub fn new(fetcher: Fetcher) -> ProductSearcher {
        ProductSearcher { fetcher }
    }

    pub fn from_config() -> Result<ProductSearcher, SearchError> {
        Ok(ProductSearcher::new(Fetcher::from_config()?))
    }

    pub async fn search(&self, raw_query: &str) -> Result<SearchResponse, SearchError> {
        let query = query::normalize(raw_query)?;

        let search_url = self.fetcher.search_url(&query)?;
        tracing::info!("searching: {search_url}");
        let html = self.fetcher.get_html(&search_url).await?;

        let candidates = match extractor::product_links(&html, self.fetcher.base_url()) {
            Ok(links) => links,
            // Empty result sets are a normal response, not a failure.
            Err(SearchError::NoResults) => {
                tracing::info!("no results for {query:?}");
                return Ok(SearchResponse::empty(query));
            }
            Err(e) => return Err(e),
        };
        tracing::info!("found {} candidate links", candidates.len());

        let selected = select_candidates(candidates, &query);

        let mut products = Vec::new();
        for (i, link) in selected.iter().enumerate() {
            if i > 0 {
                // Politeness pause between detail fetches.
                tokio::time::sleep(Duration::from_millis(CONFIG.product_delay_ms)).await;
            }
            match self.scrape_product(link).await {
                Ok(product) => {
                    tracing::info!("scraped product {}: {}", i + 1, product.name);
                    products.push(product);
                }
                // A failed detail page drops that product, not the search.
                Err(e) => {
                    tracing::warn!("skipping product {:?}: {e}", link.name);
                }
            }
        }

        Ok(SearchResponse::new(query, products))
    }

    async fn scrape_product(&self, link: &ProductLink) -> Result<ProductInfo, SearchError> {
        let url = Url::parse(&link.url)
            .map_err(|e| SearchError::Parse(format!("bad product url {:?}: {e}", link.url)))?;
        let html = self.fetcher.get_html(&url).await?;
        Ok(ProductInfo {
            name: link.name.clone(),
            url: link.url.clone(),
            specifications: extractor::specifications(&html),
        })
    }
}

/// Keep candidates whose title matches the query, preserving site
/// order, capped at `CONFIG.max_products`. When no title matches, the
/// site's own list stands: its search also matches on fields the
/// title doesn't show (model aliases, category names).
fn select_candidates(candidates: Vec<ProductLink>, query: &str) -> Vec<ProductLink> {
    let matched: Vec<ProductLink> = candidates
        .iter()
        .filter(|c| query::matches_name(&c.name, query))
        .cloned()
        .collect();

    let mut selected = if matched.is_empty() { candidates } else { matched };
    selected.truncate(CONFIG.max_products);
    selected
}

#[test]
fn test_select_candidates_prefers_title_matches() {
    let candidates = vec![
        ProductLink {
            name: "SBC-230 Industrial Board".to_string(),
            url: "https://example.com/sbc-230".to_string(),
        },
        ProductLink {
            name: "4X4 BOX-5000".to_string(),
            url: "https://example.com/4x4-box-5000".to_string(),
        },
    ];
    let selected = select_candidates(candidates, "SBC-230");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].name, "SBC-230 Industrial Board");
}

#[test]
fn test_select_candidates_falls_back_to_site_order() {
    // The site matched on something the titles don't show; keep its list.
    let candidates = vec![
        ProductLink {
            name: "IMB-1714".to_string(),
            url: "https://example.com/imb-1714".to_string(),
        },
        ProductLink {
            name: "IMB-X1231".to_string(),
            url: "https://example.com/imb-x1231".to_string(),
        },
    ];
    let selected = select_candidates(candidates.clone(), "motherboard");
    assert_eq!(selected, candidates);
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A candidate product link pulled off the search results page,
/// before its detail page has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLink {
    pub name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductInfo {
    pub name: String,
    pub url: String,
    /// Flat label -> value mapping extracted from the product page's
    /// spec tables. Keys are unique; later duplicates overwrite.
    pub specifications: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub products: Vec<ProductInfo>,
}

impl SearchResponse {
    pub fn new(query: String, products: Vec<ProductInfo>) -> SearchResponse {
        SearchResponse {
            query,
            total_results: products.len(),
            products,
        }
    }

    pub fn empty(query: String) -> SearchResponse {
        Self::new(query, Vec::new())
    }
}

#[test]
fn test_total_results_tracks_products() {
    let empty = SearchResponse::empty("nothing".to_string());
    assert_eq!(empty.total_results, 0);
    assert!(empty.products.is_empty());

    let one = SearchResponse::new(
        "SBC-230".to_string(),
        vec![ProductInfo {
            name: "SBC-230".to_string(),
            url: "https://www.asrockind.com/en-gb/product/sbc-230".to_string(),
            specifications: BTreeMap::new(),
        }],
    );
    assert_eq!(one.total_results, one.products.len());
}

#[test]
fn test_response_wire_shape() {
    let response = SearchResponse::new(
        "SBC-230".to_string(),
        vec![ProductInfo {
            name: "SBC-230".to_string(),
            url: "https://www.asrockind.com/en-gb/product/sbc-230".to_string(),
            specifications: BTreeMap::from([("CPU - TDP".to_string(), "9.5W".to_string())]),
        }],
    );

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["total_results"], 1);
    assert_eq!(json["products"][0]["specifications"]["CPU - TDP"], "9.5W");
}

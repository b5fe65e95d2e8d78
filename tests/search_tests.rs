//! Search-pipeline tests without touching the real site: error paths
//! run against a local port nothing listens on (so any accidental
//! network call surfaces as a Network error instead of hanging), and
//! the zero-result path is served from a fixture over a local socket.

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use asrockind_mcp::error::SearchError;
use asrockind_mcp::fetcher::Fetcher;
use asrockind_mcp::search::ProductSearcher;

const NO_RESULTS: &str = include_str!("fixtures/no_results.html");

fn offline_searcher() -> Result<ProductSearcher> {
    let fetcher = Fetcher::new("http://127.0.0.1:9")?.with_max_retries(0);
    Ok(ProductSearcher::new(fetcher))
}

/// Serve a fixed HTML body for every request on an ephemeral local
/// port, returning the base URL to point the fetcher at.
async fn serve_fixture(html: &'static str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                // drain the request head before answering
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    html.len(),
                    html
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn empty_query_fails_before_any_network_call() -> Result<()> {
    let searcher = offline_searcher()?;

    let err = searcher.search("").await.unwrap_err();
    assert!(
        matches!(err, SearchError::InvalidQuery(_)),
        "expected InvalidQuery, got {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn whitespace_query_fails_before_any_network_call() -> Result<()> {
    let searcher = offline_searcher()?;

    let err = searcher.search("   \t\n  ").await.unwrap_err();
    assert!(
        matches!(err, SearchError::InvalidQuery(_)),
        "expected InvalidQuery, got {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() -> Result<()> {
    let searcher = offline_searcher()?;

    let err = searcher.search("SBC-230").await.unwrap_err();
    assert!(
        matches!(err, SearchError::Network(_)),
        "expected Network, got {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn zero_product_query_is_an_empty_success() -> Result<()> {
    let base = serve_fixture(NO_RESULTS).await?;
    let searcher = ProductSearcher::new(Fetcher::new(&base)?.with_max_retries(0));

    let response = searcher.search("no-such-model-xyz").await?;
    assert_eq!(response.total_results, 0);
    assert!(response.products.is_empty());
    assert_eq!(response.query, "no-such-model-xyz");
    Ok(())
}

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        server_name: get_env_or_default("MCP_SERVER_NAME", "mcp-asrockind"),
        base_url: get_env_or_default("ASROCK_BASE_URL", "https://www.asrockind.com"),
        log_level: get_env_or_default("LOG_LEVEL", "INFO"),
        page_load_timeout_secs: get_env_parsed("PAGE_LOAD_TIMEOUT", 15),
        max_retries: get_env_parsed("MAX_RETRIES", 2),
        max_products: get_env_parsed("MAX_PRODUCTS", 3),
        product_delay_ms: get_env_parsed("PRODUCT_DELAY_MS", 750),
    }
});

pub struct Config {
    pub server_name: String,
    /// Root of the vendor site, no trailing slash.
    pub base_url: String,
    pub log_level: String,
    pub page_load_timeout_secs: u64,
    /// Extra attempts after a timeout or connect failure.
    pub max_retries: u32,
    /// Cap on product detail pages fetched per search.
    pub max_products: usize,
    /// Pause between consecutive product detail fetches.
    pub product_delay_ms: u64,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Ignoring invalid value for {key}: {raw:?}, using {default}");
            default
        }),
        Err(_) => default,
    }
}

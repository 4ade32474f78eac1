use std::time::Duration;

use reqwest::{
    Client, Error,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

/*
    Adds middleware for tracing of HTTP requests.

    Failed requests are intentionally never retried - a failed asset
    is logged and skipped, and a failed release listing ends the run.
*/
fn add_client_middleware(client: Client) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .build()
}

/**
    Creates a client with:

    - HTTPS only
    - Timeouts for connection and response
    - All common compression algorithms enabled
    - User agent set to `<crate_name>/<crate_version> (<repository_url>)`
*/
pub fn create_client(mut default_headers: HeaderMap) -> Result<ClientWithMiddleware, Error> {
    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    );

    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent).expect("crate metadata is a valid header value"),
    );

    // NOTE: Firmware images can be large, so the total timeout is generous
    let client = Client::builder()
        .default_headers(default_headers)
        .https_only(true)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(300))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(add_client_middleware(client))
}

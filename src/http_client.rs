use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const ERROR_SNIPPET_CHARS: usize = 220;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Single GET, returning the body of a 2xx response.
pub fn fetch_text(url: &str, extra_headers: &[(&str, &str)]) -> Result<String> {
    let client = http_client()?;
    let mut req = client
        .get(url)
        .header(USER_AGENT, concat!("espn-headshots/", env!("CARGO_PKG_VERSION")));
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, snippet(&body)));
    }
    Ok(body)
}

fn snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(ERROR_SNIPPET_CHARS)
        .collect()
}

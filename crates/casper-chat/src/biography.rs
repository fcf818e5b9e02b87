//! Biography loading.
//!
//! Every failure degrades to an empty biography and a warning; a missing
//! biography never stops the assistant.

use std::path::PathBuf;

use tracing::{info, warn};

/// Where the biography text lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiographySource {
    Inline(String),
    File(PathBuf),
    Url(String),
    None,
}

/// Fetch the biography from `url`. Returns an empty string on any failure.
pub async fn fetch_details(http: &reqwest::Client, url: &str) -> String {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("error loading details from {url}: {e}");
            return String::new();
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        warn!(status = %response.status(), "failed to fetch details from {url}");
        return String::new();
    }

    match response.text().await {
        Ok(text) => {
            info!(bytes = text.len(), "loaded biography from {url}");
            text
        }
        Err(e) => {
            warn!("error reading details body from {url}: {e}");
            String::new()
        }
    }
}

/// Resolve a `BiographySource` to text.
pub async fn load_biography(source: &BiographySource, http: &reqwest::Client) -> String {
    match source {
        BiographySource::Inline(text) => text.clone(),
        BiographySource::File(path) => match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                info!("loaded biography from {}", path.display());
                text
            }
            Err(e) => {
                warn!("error loading details from {}: {e}", path.display());
                String::new()
            }
        },
        BiographySource::Url(url) => fetch_details(http, url).await,
        BiographySource::None => {
            warn!("no biography configured, prompts will carry no details");
            String::new()
        }
    }
}

//! Swan image resolution with sequential fallback.
//!
//! An ordered list of candidate sources is probed with HEAD requests; the
//! first one answering 200 within the per-probe timeout wins, otherwise the
//! external fallback URL is used.

use std::time::Duration;

use axum::http::StatusCode;

/// Per-probe timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// External image used when no internal service answers
const FALLBACK_URL: &str =
    "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=800&q=80";

/// A candidate image source, tried in order
#[derive(Debug, Clone, Copy)]
pub struct ImageCandidate {
    pub url: &'static str,
    pub source: &'static str,
}

/// Internal image services, preferred over the external fallback
pub const SWAN_IMAGE_CANDIDATES: &[ImageCandidate] = &[
    ImageCandidate {
        url: "http://image-service.swan-dev.local/assets/flying-swans.jpg",
        source: "DEV",
    },
    ImageCandidate {
        url: "http://image-service.swan-prod.local/assets/flying-swans.jpg",
        source: "PROD",
    },
];

/// The image the page should embed, and where it came from
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub url: String,
    pub source: &'static str,
}

/// Probe candidates in order, falling back to the external URL.
pub async fn resolve_image(
    http: &reqwest::Client,
    candidates: &[ImageCandidate],
) -> ResolvedImage {
    for candidate in candidates {
        match http
            .head(candidate.url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::debug!(source = candidate.source, "using internal image service");
                return ResolvedImage {
                    url: candidate.url.to_string(),
                    source: candidate.source,
                };
            }
            Ok(response) => {
                tracing::debug!(
                    source = candidate.source,
                    status = %response.status(),
                    "image service refused probe"
                );
            }
            Err(e) => {
                tracing::debug!(source = candidate.source, error = %e, "image service unavailable");
            }
        }
    }

    tracing::debug!("using external fallback image");
    ResolvedImage {
        url: FALLBACK_URL.to_string(),
        source: "EXTERNAL",
    }
}

/// Resolve the swan image from the standard candidate list.
pub async fn resolve_swan_image(http: &reqwest::Client) -> ResolvedImage {
    resolve_image(http, SWAN_IMAGE_CANDIDATES).await
}

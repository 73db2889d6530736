//! # Link Previews
//!
//! Link cards can show a title and image fetched from an external preview
//! service. Previews are strictly best effort: every failure (no credential,
//! network error, non-2xx status, malformed body) turns into
//! [`PreviewState::Unavailable`] and the card renders without one.
//!
//! The service sits behind the [`PreviewFetcher`] trait so the provider can be
//! swapped, and tests use an in-process fake. [`HttpPreviewFetcher`] speaks the
//! linkpreview.net style API: `GET {endpoint}?key={key}&q={url}` answering JSON
//! with optional `title` and `image` fields.
//!
//! Fetches run as independent Tokio tasks, one per card, and report back as
//! [`PreviewOutcome`]s. The owner decides whether an outcome still applies.

use crate::config::PreviewConfig;
use crate::error::{NotecaseError, Result};
use crate::model::ItemId;
use log::{debug, warn};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkPreview {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Ready(LinkPreview),
    Unavailable,
}

/// A finished fetch for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub card_id: ItemId,
    /// The URL that was fetched; the card may have been edited since.
    pub url: String,
    pub state: PreviewState,
}

pub trait PreviewFetcher: Send + Sync + 'static {
    fn fetch_preview(&self, url: &str) -> impl Future<Output = Result<LinkPreview>> + Send;

    /// Whether fetching can succeed at all. Disabled fetchers are never called.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// `None` stands for "no preview service configured".
impl<F: PreviewFetcher> PreviewFetcher for Option<F> {
    async fn fetch_preview(&self, url: &str) -> Result<LinkPreview> {
        match self {
            Some(fetcher) => fetcher.fetch_preview(url).await,
            None => Err(NotecaseError::Preview(
                "no preview service configured".to_string(),
            )),
        }
    }

    fn is_enabled(&self) -> bool {
        self.as_ref().is_some_and(PreviewFetcher::is_enabled)
    }
}

pub struct HttpPreviewFetcher {
    client: reqwest::Client,
    endpoint: url::Url,
    api_key: String,
}

impl HttpPreviewFetcher {
    pub fn new(endpoint: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let endpoint = url::Url::parse(endpoint).map_err(|e| {
            NotecaseError::Config(format!("invalid preview endpoint '{}': {}", endpoint, e))
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Builds a fetcher when previews are enabled and the credential is set.
    pub fn from_config(config: &PreviewConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let Some(api_key) = config.api_key() else {
            debug!(
                "link previews disabled: ${} is not set",
                config.api_key_env
            );
            return Ok(None);
        };
        Self::new(
            &config.endpoint,
            api_key,
            Duration::from_millis(config.timeout_ms),
        )
        .map(Some)
    }

    fn request_url(&self, target: &str) -> url::Url {
        let mut request = self.endpoint.clone();
        request
            .query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", target);
        request
    }
}

impl PreviewFetcher for HttpPreviewFetcher {
    async fn fetch_preview(&self, url: &str) -> Result<LinkPreview> {
        let response = self
            .client
            .get(self.request_url(url))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let preview: LinkPreview = serde_json::from_str(&body)?;
        Ok(preview)
    }
}

/// Fetches a preview, folding every failure into `Unavailable`.
pub async fn fetch_or_unavailable<F: PreviewFetcher>(fetcher: &F, url: &str) -> PreviewState {
    match fetcher.fetch_preview(url).await {
        Ok(preview) => PreviewState::Ready(preview),
        Err(e) => {
            warn!("no preview for {}: {}", url, e);
            PreviewState::Unavailable
        }
    }
}

/// Starts a fetch for one card on the current runtime.
///
/// The outcome is sent on `tx`; a closed channel just drops it.
pub fn spawn_fetch<F: PreviewFetcher>(
    fetcher: Arc<F>,
    card_id: ItemId,
    url: String,
    tx: mpsc::UnboundedSender<PreviewOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let state = fetch_or_unavailable(fetcher.as_ref(), &url).await;
        if tx.send(PreviewOutcome { card_id, url, state }).is_err() {
            debug!("preview for card {} finished after its receiver closed", card_id.short());
        }
    })
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table; unknown URLs fail like a network error.
    #[derive(Default)]
    pub struct FakeFetcher {
        pub answers: HashMap<String, LinkPreview>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn with(mut self, url: &str, title: &str) -> Self {
            self.answers.insert(
                url.to_string(),
                LinkPreview {
                    title: Some(title.to_string()),
                    image: Some(format!("{}/og.png", url)),
                },
            );
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    impl PreviewFetcher for FakeFetcher {
        async fn fetch_preview(&self, url: &str) -> Result<LinkPreview> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(url.to_string());
            }
            self.answers
                .get(url)
                .cloned()
                .ok_or_else(|| NotecaseError::Preview("connection refused".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeFetcher;
    use super::*;

    #[test]
    fn request_url_encodes_target() {
        let fetcher = HttpPreviewFetcher::new(
            "https://api.linkpreview.net/",
            "secret".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let url = fetcher.request_url("https://example.com/a b?x=1&y=2");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("key".to_string(), "secret".to_string()));
        assert_eq!(
            pairs[1],
            ("q".to_string(), "https://example.com/a b?x=1&y=2".to_string())
        );
        assert!(!url.as_str().contains("x=1&y=2"));
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let err = HttpPreviewFetcher::new("not a url", String::new(), Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, NotecaseError::Config(_)));
    }

    #[test]
    fn payload_fields_are_optional() {
        let p: LinkPreview = serde_json::from_str(r#"{"title":"Hi","description":"x"}"#).unwrap();
        assert_eq!(p.title.as_deref(), Some("Hi"));
        assert_eq!(p.image, None);
        assert!(serde_json::from_str::<LinkPreview>("<html>").is_err());
    }

    #[tokio::test]
    async fn failures_become_unavailable() {
        let fetcher = FakeFetcher::default();
        let state = fetch_or_unavailable(&fetcher, "https://down.example").await;
        assert_eq!(state, PreviewState::Unavailable);
    }

    #[tokio::test]
    async fn missing_service_is_disabled_and_fails() {
        let none: Option<FakeFetcher> = None;
        assert!(!none.is_enabled());
        assert_eq!(
            fetch_or_unavailable(&none, "https://example.com").await,
            PreviewState::Unavailable
        );
        assert!(Some(FakeFetcher::default()).is_enabled());
    }

    #[tokio::test]
    async fn spawned_fetch_reports_outcome() {
        let fetcher = Arc::new(FakeFetcher::default().with("https://example.com", "Example"));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ItemId::new();

        spawn_fetch(fetcher, id, "https://example.com".into(), tx)
            .await
            .unwrap();
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.card_id, id);
        assert!(matches!(outcome.state, PreviewState::Ready(ref p) if p.title.as_deref() == Some("Example")));
    }
}

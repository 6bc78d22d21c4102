//! Instagram Graph API client.

use async_trait::async_trait;
use confessio_error::{ConfessioResult, PublishError, PublishErrorKind};
use confessio_interface::Publisher;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

const GRAPH_API_BASE: &str = "https://graph.facebook.com";

/// How long a media container gets to finish processing before the
/// publish call. The Graph API rejects publishes against containers it
/// has not finished ingesting.
const CONTAINER_SETTLE: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GraphId {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenExchange {
    access_token: Option<String>,
}

/// Client for one Instagram business account.
#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
    api_version: String,
    account_id: String,
    app_id: String,
    app_secret: String,
    settle_delay: Duration,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("api_version", &self.api_version)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    /// Create a client for one account.
    ///
    /// The access token is not client state: it lives in the sheet and
    /// is passed into each call.
    pub fn new(
        api_version: impl Into<String>,
        account_id: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        debug!("Creating new Graph API client");
        Self {
            client: Client::new(),
            base_url: GRAPH_API_BASE.to_string(),
            api_version: api_version.into(),
            account_id: account_id.into(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            settle_delay: CONTAINER_SETTLE,
        }
    }

    /// Point the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the container settle delay. Test hook.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url, self.api_version, self.account_id, suffix
        )
    }

    /// POST a Graph endpoint and pull the `id` out of the answer.
    #[instrument(skip(self, access_token, params))]
    async fn post_for_id(
        &self,
        url: &str,
        access_token: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("access_token", access_token));

        let response = self
            .client
            .post(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send Graph API request");
                PublishError::new(PublishErrorKind::Request(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Graph API returned error");
            return Err(PublishError::new(PublishErrorKind::Api {
                status_code: status.as_u16(),
                message: body,
            }));
        }

        let answer: GraphId = response.json().await.map_err(|e| {
            PublishError::new(PublishErrorKind::MissingId(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        answer.id.ok_or_else(|| {
            PublishError::new(PublishErrorKind::MissingId(
                "response carried no id".to_string(),
            ))
        })
    }

    /// Create the media container for a post.
    async fn create_container(
        &self,
        access_token: &str,
        urls: &[String],
        caption: &str,
    ) -> Result<String, PublishError> {
        let media_url = self.endpoint("media");

        if urls.len() == 1 {
            debug!("Creating single-image container");
            return self
                .post_for_id(
                    &media_url,
                    access_token,
                    &[("image_url", &urls[0]), ("caption", caption)],
                )
                .await;
        }

        debug!(slides = urls.len(), "Creating carousel containers");
        let mut children = Vec::with_capacity(urls.len());
        for url in urls {
            let child = self
                .post_for_id(
                    &media_url,
                    access_token,
                    &[("image_url", url), ("is_carousel_item", "true")],
                )
                .await?;
            children.push(child);
        }

        let children = children.join(",");
        self.post_for_id(
            &media_url,
            access_token,
            &[
                ("media_type", "CAROUSEL"),
                ("children", &children),
                ("caption", caption),
            ],
        )
        .await
    }
}

#[async_trait]
impl Publisher for GraphClient {
    #[instrument(skip(self, access_token, urls, caption), fields(slides = urls.len()))]
    async fn publish(
        &self,
        access_token: &str,
        urls: &[String],
        caption: &str,
    ) -> ConfessioResult<String> {
        if urls.is_empty() || urls.len() > 10 {
            return Err(PublishError::new(PublishErrorKind::CarouselSize(urls.len())))?;
        }

        let container = self.create_container(access_token, urls, caption).await?;

        // Give ingestion a moment before publishing the container.
        tokio::time::sleep(self.settle_delay).await;

        let post_id = self
            .post_for_id(
                &self.endpoint("media_publish"),
                access_token,
                &[("creation_id", &container)],
            )
            .await?;
        debug!(post_id, "Post published");
        Ok(post_id)
    }

    #[instrument(skip(self, token))]
    async fn refresh_token(&self, token: &str) -> ConfessioResult<String> {
        let url = format!("{}/{}/oauth/access_token", self.base_url, self.api_version);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", &self.app_id),
                ("client_secret", &self.app_secret),
                ("fb_exchange_token", token),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send token exchange request");
                PublishError::new(PublishErrorKind::TokenRefresh(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Token exchange returned error");
            return Err(PublishError::new(PublishErrorKind::TokenRefresh(format!(
                "HTTP {}: {}",
                status, body
            ))))?;
        }

        let exchange: TokenExchange = response.json().await.map_err(|e| {
            PublishError::new(PublishErrorKind::TokenRefresh(format!(
                "Failed to parse exchange response: {}",
                e
            )))
        })?;

        exchange
            .access_token
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::TokenRefresh(
                    "exchange response carried no token".to_string(),
                ))
            })
            .map_err(Into::into)
    }
}

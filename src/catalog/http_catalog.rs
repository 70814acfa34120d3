use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::app::{PaperbitesError, Result};
use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::domain::{FeedPage, PageQuery, PaperInfo, VideoArtifact};

const TOTAL_COUNT_HEADER: &str = "x-total-count";

pub struct HttpCatalog {
    client: Client,
    base_url: Url,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("paperbites/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::with_client(client, &config.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PaperbitesError::Config(format!(
                "Catalog URL cannot be used as a base: {}",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn page_url(&self, query: &PageQuery) -> Url {
        let mut url = self.endpoint(&["videos"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            pairs.append_pair("offset", &query.offset.to_string());
            if let Some(ref keyword) = query.keyword {
                pairs.append_pair("keyword", keyword);
            }
            if let Some(public_only) = query.public_only {
                pairs.append_pair("public_only", if public_only { "true" } else { "false" });
            }
        }
        url
    }

    async fn get(&self, url: Url) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.get(url).await?;
        read_json(response).await
    }
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PaperbitesError::network(
            Some(status.as_u16()),
            error_message(status, &body),
        ));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        PaperbitesError::network(
            Some(status.as_u16()),
            format!("Malformed response body: {}", e),
        )
    })
}

fn total_count(response: &Response) -> Option<usize> {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn fetch_page(&self, query: &PageQuery) -> Result<FeedPage> {
        let response = self.get(self.page_url(query)).await?;
        let total = total_count(&response);
        let mut items: Vec<VideoArtifact> = read_json(response).await?;

        if items.len() > query.limit {
            tracing::warn!(
                "Catalog returned {} items for a page of {}, truncating",
                items.len(),
                query.limit
            );
            items.truncate(query.limit);
        }

        tracing::debug!(
            "Fetched {} videos at offset {} (total: {:?})",
            items.len(),
            query.offset,
            total
        );

        Ok(FeedPage {
            items,
            offset: query.offset,
            limit: query.limit,
            total,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<VideoArtifact> {
        let response = self.get(self.endpoint(&["videos", id])).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PaperbitesError::NotFound(format!("video {}", id)));
        }
        read_json(response).await
    }

    async fn fetch_topics(&self) -> Result<Vec<String>> {
        let topics: Vec<String> = self.get_json(self.endpoint(&["topics"])).await?;

        let mut unique: Vec<String> = Vec::with_capacity(topics.len());
        for topic in topics {
            if !unique.contains(&topic) {
                unique.push(topic);
            }
        }
        Ok(unique)
    }

    async fn search_papers(
        &self,
        query: &str,
        max_results: usize,
        public_only: bool,
    ) -> Result<Vec<PaperInfo>> {
        let mut url = self.endpoint(&["search"]);
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("max_results", &max_results.to_string())
            .append_pair("public_only", if public_only { "true" } else { "false" });

        self.get_json(url).await
    }

    async fn fetch_paper(&self, id: &str) -> Result<PaperInfo> {
        let response = self.get(self.endpoint(&["paper", id])).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PaperbitesError::NotFound(format!("paper {}", id)));
        }
        read_json(response).await
    }
}

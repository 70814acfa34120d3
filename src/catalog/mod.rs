pub mod http_catalog;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{FeedPage, PageQuery, PaperInfo, VideoArtifact};

pub use http_catalog::HttpCatalog;

/// Read-only access to the remote video catalog.
///
/// Every call is one request with no retry. Non-2xx responses and transport
/// failures come back as `PaperbitesError::Network`; a missing id as
/// `PaperbitesError::NotFound`.
#[async_trait]
pub trait Catalog {
    async fn fetch_page(&self, query: &PageQuery) -> Result<FeedPage>;

    async fn fetch_by_id(&self, id: &str) -> Result<VideoArtifact>;

    /// Topics in the catalog's order, without duplicates.
    async fn fetch_topics(&self) -> Result<Vec<String>>;

    async fn search_papers(
        &self,
        query: &str,
        max_results: usize,
        public_only: bool,
    ) -> Result<Vec<PaperInfo>>;

    async fn fetch_paper(&self, id: &str) -> Result<PaperInfo>;
}

use serde::{Deserialize, Serialize};

/// A rendered video as served by the catalog. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoArtifact {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "videoUrl", alias = "video_url")]
    pub video_url: String,
    #[serde(
        rename = "thumbnailUrl",
        alias = "thumbnail_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "keyInsights", alias = "key_insights", default)]
    pub key_insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Landing page of the source paper.
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,
    /// Unix seconds at which the catalog produced the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub can_display_publicly: bool,
}

impl VideoArtifact {
    pub fn new(id: impl Into<String>, title: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            video_url: video_url.into(),
            thumbnail_url: None,
            doi: None,
            keywords: Vec::new(),
            key_insights: Vec::new(),
            hashtags: None,
            authors: Vec::new(),
            license: None,
            paper_url: None,
            timestamp: None,
            can_display_publicly: false,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Whether `keyword` appears (case-insensitively) in the title, summary or keywords.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.summary.to_lowercase().contains(&needle)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(&needle))
    }
}

/// Paper metadata returned by the catalog's search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub can_display_publicly: bool,
}

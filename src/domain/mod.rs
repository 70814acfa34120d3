pub mod history;
pub mod page;
pub mod settings;
pub mod video;

pub use history::HistoryEntry;
pub use page::{FeedPage, PageQuery};
pub use settings::{DownloadQuality, Settings, SettingsUpdate};
pub use video::{PaperInfo, VideoArtifact};

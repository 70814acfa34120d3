use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for DownloadQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadQuality::Low => "low",
            DownloadQuality::Medium => "medium",
            DownloadQuality::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for DownloadQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(DownloadQuality::Low),
            "medium" => Ok(DownloadQuality::Medium),
            "high" => Ok(DownloadQuality::High),
            other => Err(format!(
                "Invalid download quality: {}. Use low, medium or high",
                other
            )),
        }
    }
}

/// User preferences. Fields missing from a stored document take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub autoplay: bool,
    pub dark_mode: bool,
    pub download_quality: DownloadQuality,
    pub push_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoplay: true,
            dark_mode: false,
            download_quality: DownloadQuality::Medium,
            push_notifications: true,
        }
    }
}

impl Settings {
    /// Apply every field present in `update`, leaving the rest untouched.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(autoplay) = update.autoplay {
            self.autoplay = autoplay;
        }
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(quality) = update.download_quality {
            self.download_quality = quality;
        }
        if let Some(push) = update.push_notifications {
            self.push_notifications = push;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub autoplay: Option<bool>,
    pub dark_mode: Option<bool>,
    pub download_quality: Option<DownloadQuality>,
    pub push_notifications: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.autoplay);
        assert!(!settings.dark_mode);
        assert_eq!(settings.download_quality, DownloadQuality::Medium);
        assert!(settings.push_notifications);
    }

    #[test]
    fn test_merge_partial() {
        let mut settings = Settings::default();
        settings.merge(&SettingsUpdate {
            dark_mode: Some(true),
            ..Default::default()
        });

        assert_eq!(
            settings,
            Settings {
                dark_mode: true,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_document_shape() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["darkMode"], false);
        assert_eq!(value["downloadQuality"], "medium");
        assert_eq!(value["pushNotifications"], true);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"darkMode": true}"#).unwrap();
        assert!(settings.dark_mode);
        assert!(settings.autoplay);
        assert_eq!(settings.download_quality, DownloadQuality::Medium);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("HIGH".parse::<DownloadQuality>(), Ok(DownloadQuality::High));
        assert_eq!(" low ".parse::<DownloadQuality>(), Ok(DownloadQuality::Low));
        assert!("ultra".parse::<DownloadQuality>().is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(SettingsUpdate::default().is_empty());
        assert!(!SettingsUpdate {
            autoplay: Some(false),
            ..Default::default()
        }
        .is_empty());
    }
}

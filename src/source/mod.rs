//! External collaborators: where the weekly post and its text come from
//!
//! The pipeline only needs a post (timestamp + image) and the text on that
//! image. Each concern is a trait; `Pipeline::run` takes them as trait
//! objects and its tests drive it with fixed values.

mod http;
pub(crate) mod twitter;
pub(crate) mod vision;

use chrono::{DateTime, Utc};

use crate::error::SourceError;

pub(crate) use twitter::TwitterFeed;
pub(crate) use vision::VisionOcr;

/// A social-media post announcing the weekly menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) id: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) text: String,
    /// First attached image, if any
    pub(crate) image_url: Option<String>,
}

impl Post {
    pub(crate) fn image_url(&self) -> Result<&str, SourceError> {
        self.image_url
            .as_deref()
            .ok_or_else(|| SourceError::NoImage {
                id: self.id.clone(),
            })
    }
}

/// Supplies the most recent eligible post
pub(crate) trait PostSource {
    /// Display name for log output
    fn name(&self) -> &'static str;

    fn latest_post(&self) -> Result<Post, SourceError>;
}

/// Turns an image into text
pub(crate) trait OcrEngine {
    fn name(&self) -> &'static str;

    fn recognize(&self, image_url: &str) -> Result<String, SourceError>;
}

/// Read a credential from the environment, treating blank values as unset
pub(crate) fn credential(var: &'static str) -> Result<String, SourceError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SourceError::MissingCredential(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(image_url: Option<&str>) -> Post {
        Post {
            id: "1765".to_string(),
            created_at: "2024-03-04T01:00:00Z".parse().unwrap(),
            text: "今週の週替わり定食".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn image_url_present() {
        assert_eq!(
            post(Some("https://pbs.example/menu.jpg")).image_url().unwrap(),
            "https://pbs.example/menu.jpg"
        );
    }

    #[test]
    fn image_url_missing_names_post() {
        let err = post(None).image_url().unwrap_err();
        assert_eq!(err.to_string(), "Post 1765 has no attached image");
    }

    #[test]
    fn missing_credential_names_variable() {
        let err = credential("WEEKLY_MENU_TEST_UNSET_CREDENTIAL").unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingCredential("WEEKLY_MENU_TEST_UNSET_CREDENTIAL")
        ));
    }
}

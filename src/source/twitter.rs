//! Weekly menu posts from the X/Twitter recent-search API
//!
//! Every configured query is searched from the shop's account; the newest
//! hit of each query is a candidate and the newest candidate wins.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::error::SourceError;

use super::http::{agent, read_json};
use super::{Post, PostSource, credential};

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
pub(crate) const TOKEN_VAR: &str = "TW_BEARER_TOKEN";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    attachments: Attachments,
}

#[derive(Debug, Default, Deserialize)]
struct Attachments {
    #[serde(default)]
    media_keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    media_key: String,
    #[serde(default)]
    url: Option<String>,
}

pub(crate) struct TwitterFeed {
    account: String,
    queries: Vec<String>,
    token: String,
    agent: ureq::Agent,
}

impl TwitterFeed {
    pub(crate) fn new(config: &FeedConfig) -> Result<Self, SourceError> {
        Ok(Self {
            account: config.account.clone(),
            queries: config.queries.clone(),
            token: credential(TOKEN_VAR)?,
            agent: agent(),
        })
    }

    fn search(&self, query: &str) -> Result<Option<Post>, SourceError> {
        let full_query = format!("{query} from:{}", self.account);
        debug!(query = %full_query, "searching posts");

        let response = self
            .agent
            .get(SEARCH_URL)
            .header("Authorization", format!("Bearer {}", self.token))
            .query("query", &full_query)
            .query("max_results", "10")
            .query("tweet.fields", "created_at,attachments")
            .query("expansions", "attachments.media_keys")
            .query("media.fields", "url,type")
            .call()?;

        let parsed: SearchResponse = read_json(response, "post search")?;
        Ok(newest_post(parsed))
    }
}

impl PostSource for TwitterFeed {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn latest_post(&self) -> Result<Post, SourceError> {
        let mut candidates = Vec::new();
        for query in &self.queries {
            match self.search(query)? {
                Some(post) => candidates.push(post),
                None => warn!(query = %query, "no post found"),
            }
        }

        let post = pick_newest(candidates).ok_or(SourceError::NoPost)?;
        info!(id = %post.id, created_at = %post.created_at, "found weekly post");
        Ok(post)
    }
}

fn newest_post(response: SearchResponse) -> Option<Post> {
    let media_urls: HashMap<String, String> = response
        .includes
        .media
        .into_iter()
        .filter_map(|m| m.url.map(|url| (m.media_key, url)))
        .collect();

    let tweet = response.data.into_iter().max_by_key(|t| t.created_at)?;
    let image_url = tweet
        .attachments
        .media_keys
        .iter()
        .find_map(|key| media_urls.get(key).cloned());

    Some(Post {
        id: tweet.id,
        created_at: tweet.created_at,
        text: tweet.text,
        image_url,
    })
}

fn pick_newest(candidates: Vec<Post>) -> Option<Post> {
    candidates.into_iter().max_by_key(|p| p.created_at)
}

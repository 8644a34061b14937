use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

use crate::config::MetadataConfig;
use crate::metadata::MetadataClient;
use crate::model::{parse_release_date, SongDetails};

/// Body returned by `GET /info`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongDetailResponse {
    release_date: String,
    text: String,
    link: String,
}

impl SongDetailResponse {
    fn into_details(self) -> Result<SongDetails> {
        let release_date = parse_release_date(&self.release_date)
            .ok_or_else(|| anyhow!("Unparseable release date: {}", self.release_date))?;

        Ok(SongDetails {
            release_date,
            text: self.text,
            link: self.link,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetadataClient {
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .context("Failed to build metadata HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn info_url(&self) -> String {
        format!("{}/info", self.base_url)
    }
}

#[async_trait::async_trait]
impl MetadataClient for HttpMetadataClient {
    async fn fetch_song_details(&self, group: &str, title: &str) -> Result<SongDetails> {
        let url = self.info_url();
        debug!("Requesting song details from {} for {} - {}", url, group, title);

        let response = self
            .client
            .get(&url)
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .context("Metadata API request failed")?
            .error_for_status()
            .context("Metadata API returned an error status")?;

        let body: SongDetailResponse = response
            .json()
            .await
            .context("Failed to parse metadata API response")?;

        body.into_details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_response_with_day_first_date() {
        let body: SongDetailResponse = serde_json::from_str(
            r#"{
                "releaseDate": "16.07.2006",
                "text": "Ooh baby, don't you know I suffer?\n\nYou caught me under false pretenses",
                "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
            }"#,
        )
        .unwrap();

        let details = body.into_details().unwrap();
        assert_eq!(
            details.release_date,
            NaiveDate::from_ymd_opt(2006, 7, 16).unwrap()
        );
        assert_eq!(details.link, "https://www.youtube.com/watch?v=Xsp3_a-PMTw");
    }

    #[test]
    fn test_response_with_timestamp_date() {
        let body: SongDetailResponse = serde_json::from_str(
            r#"{
                "releaseDate": "2006-07-16T00:00:00Z",
                "text": "Ooh baby, don't you know I suffer?",
                "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
            }"#,
        )
        .unwrap();

        let details = body.into_details().unwrap();
        assert_eq!(
            details.release_date,
            NaiveDate::from_ymd_opt(2006, 7, 16).unwrap()
        );
    }

    #[test]
    fn test_response_with_bad_date_is_rejected() {
        let body = SongDetailResponse {
            release_date: "sometime in 2006".to_string(),
            text: String::new(),
            link: String::new(),
        };
        assert!(body.into_details().is_err());
    }

    #[test]
    fn test_info_url_ignores_trailing_slash() {
        let client = HttpMetadataClient::new(&MetadataConfig {
            base_url: "http://music-api:8080/".to_string(),
            timeout_secs: Some(5),
        })
        .unwrap();
        assert_eq!(client.info_url(), "http://music-api:8080/info");
    }
}

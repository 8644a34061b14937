pub mod http;

pub use http::*;

use anyhow::Result;

use crate::model::SongDetails;

/// External lookup of release date, lyrics and link for a song.
///
/// Implementations perform a single attempt; retries and backoff are not
/// part of this contract.
#[async_trait::async_trait]
pub trait MetadataClient: Send + Sync {
    async fn fetch_song_details(&self, group: &str, title: &str) -> Result<SongDetails>;
}

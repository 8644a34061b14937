use anyhow::Result;

use crate::logic::{ListingQuery, UpdatePlan};
use crate::model::{Id, NewSong, Song};

/// Persistence collaborator for the song catalog.
///
/// Missing rows are reported as `Ok(None)` / `Ok(false)`; `Err` is reserved for
/// connection, query and transaction failures. Multi-statement operations
/// (`create_song`, `apply_update`) run inside a single transaction that is
/// rolled back on every exit path other than an explicit commit.
#[async_trait::async_trait]
pub trait SongStore: Send + Sync {
    /// Songs matching the query, joined with their group name.
    ///
    /// Rows come back in whatever order storage yields them; no ordering is
    /// imposed, so the relative order of songs across calls is not guaranteed.
    async fn list_songs(&self, query: &ListingQuery) -> Result<Vec<Song>>;

    /// Lyrics of a single song
    async fn get_song_text(&self, id: Id) -> Result<Option<String>>;

    /// Find-or-create the group by name and insert the song, atomically
    async fn create_song(&self, new_song: NewSong) -> Result<Song>;

    /// Apply the plan to the song and its group. Returns `false` (with nothing
    /// committed) when the plan touches the song row and the song does not exist.
    async fn apply_update(&self, id: Id, plan: &UpdatePlan) -> Result<bool>;

    async fn delete_song(&self, id: Id) -> Result<bool>;

    /// Cheap reachability check used by the health endpoint
    async fn ping(&self) -> Result<()>;
}

use log::{debug, error, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::logic::criteria::ListingQuery;
use crate::logic::update_plan::UpdatePlan;
use crate::logic::verses::paginate_verses;
use crate::metadata::MetadataClient;
use crate::model::{Id, NewSong, Pagination, Song, SongFilter, SongPage, SongPatch, VersePage};
use crate::store::traits::SongStore;

/// Entry point for every catalog operation.
///
/// Validates caller input, drives the store and the metadata lookup, and
/// reports outcomes through [`CatalogError`]. Nothing is cached between
/// calls: each operation reads storage afresh.
pub struct SongCatalog<S, M> {
    store: S,
    metadata: M,
}

impl<S: SongStore, M: MetadataClient> SongCatalog<S, M> {
    pub fn new(store: S, metadata: M) -> Self {
        Self { store, metadata }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_songs(
        &self,
        filter: &SongFilter,
        page: i64,
        limit: i64,
    ) -> CatalogResult<SongPage> {
        info!("Request to get songs with filters: {:?}", filter);
        let query = ListingQuery::build(filter, page, limit)?;
        debug!(
            "Adding pagination: LIMIT={}, OFFSET={}",
            query.pagination().limit(),
            query.pagination().offset()
        );

        let songs = self.store.list_songs(&query).await.map_err(|e| {
            error!("Failed to retrieve songs: {:#}", e);
            CatalogError::Storage(e)
        })?;

        info!("Retrieved {} songs successfully", songs.len());
        Ok(SongPage {
            page,
            limit,
            songs,
        })
    }

    pub async fn get_verses(&self, id: Id, page: i64, limit: i64) -> CatalogResult<VersePage> {
        let pagination = Pagination::new(page, limit)?;

        let text = self.store.get_song_text(id).await.map_err(|e| {
            error!("Failed to retrieve song text for ID {}: {:#}", id, e);
            CatalogError::Storage(e)
        })?;
        let Some(text) = text else {
            info!("Song with ID {} not found", id);
            return Err(CatalogError::not_found("Song not found"));
        };

        let verses = paginate_verses(&text, pagination).map_err(|e| {
            info!("No verses on page {} of song {}", page, id);
            e
        })?;

        info!("Text of song with ID {} retrieved successfully", id);
        Ok(verses)
    }

    pub async fn create_song(&self, group: &str, title: &str) -> CatalogResult<Song> {
        let group = group.trim();
        let title = title.trim();
        if group.is_empty() {
            return Err(CatalogError::validation("Field 'group' is required"));
        }
        if title.is_empty() {
            return Err(CatalogError::validation("Field 'song' is required"));
        }
        debug!("Received request to add song - Group: {}, Song: {}", group, title);

        // Nothing is written unless the lookup succeeds
        let details = self
            .metadata
            .fetch_song_details(group, title)
            .await
            .map_err(|e| {
                error!("Failed to get song info from external API: {:#}", e);
                CatalogError::ExternalService(e)
            })?;
        debug!("Retrieved song details from external API: {:?}", details);

        let new_song = NewSong::new(group.to_string(), title.to_string(), details);
        let song = self.store.create_song(new_song).await.map_err(|e| {
            error!("Failed to store song: {:#}", e);
            CatalogError::Storage(e)
        })?;

        info!("Song successfully added with ID: {}", song.id);
        Ok(song)
    }

    pub async fn update_song(&self, id: Id, patch: &SongPatch) -> CatalogResult<()> {
        let plan = UpdatePlan::from_patch(patch)?;
        if plan.is_empty() {
            debug!("Empty patch for song {}, nothing to update", id);
            return Ok(());
        }
        debug!("Planned update for song {}: {:?}", id, plan);

        let updated = self.store.apply_update(id, &plan).await.map_err(|e| {
            error!("Failed to update song {}: {:#}", id, e);
            CatalogError::Storage(e)
        })?;

        if !updated {
            warn!("No song found with ID: {}", id);
            return Err(CatalogError::not_found("Song not found"));
        }

        info!("Song with ID {} updated successfully", id);
        Ok(())
    }

    pub async fn delete_song(&self, id: Id) -> CatalogResult<()> {
        let deleted = self.store.delete_song(id).await.map_err(|e| {
            error!("Failed to delete song with ID {}: {:#}", id, e);
            CatalogError::Storage(e)
        })?;

        if !deleted {
            info!("Song with ID {} not found", id);
            return Err(CatalogError::not_found("Song not found"));
        }

        info!("Song with ID {} deleted successfully", id);
        Ok(())
    }

    pub async fn health(&self) -> CatalogResult<()> {
        self.store.ping().await.map_err(CatalogError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SongDetails;
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Metadata lookup that returns fixed details, or fails when `details` is None
    #[derive(Default)]
    struct FixedMetadata {
        details: Option<SongDetails>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedMetadata {
        fn returning(release_date: &str, text: &str, link: &str) -> Self {
            Self {
                details: Some(SongDetails {
                    release_date: NaiveDate::parse_from_str(release_date, "%Y-%m-%d").unwrap(),
                    text: text.to_string(),
                    link: link.to_string(),
                }),
                calls: Arc::default(),
            }
        }
    }

    #[async_trait::async_trait]
    impl MetadataClient for FixedMetadata {
        async fn fetch_song_details(&self, _group: &str, _title: &str) -> anyhow::Result<SongDetails> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.details
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn catalog() -> SongCatalog<MemoryStore, FixedMetadata> {
        SongCatalog::new(
            MemoryStore::new(),
            FixedMetadata::returning("2000-01-01", "A\n\nB\n\nC", "L"),
        )
    }

    fn all() -> SongFilter {
        SongFilter::default()
    }

    #[tokio::test]
    async fn test_create_new_group_and_song() {
        let catalog = SongCatalog::new(
            MemoryStore::new(),
            FixedMetadata::returning("2000-01-01", "V1\n\nV2", "L"),
        );

        let song = catalog.create_song("G", "T").await.unwrap();

        assert_eq!(song.group, "G");
        assert_eq!(song.title, "T");
        assert_eq!(song.release_date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(song.text, "V1\n\nV2");
        assert_eq!(song.link, "L");
        assert_eq!(catalog.store().groups().await.len(), 1);
        assert_eq!(catalog.store().song_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_requires_group_and_title() {
        let catalog = catalog();

        assert!(catalog.create_song("", "T").await.unwrap_err().is_validation());
        assert!(catalog.create_song("G", "   ").await.unwrap_err().is_validation());
        assert_eq!(catalog.metadata.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_aborts_before_storage_when_lookup_fails() {
        let catalog = SongCatalog::new(MemoryStore::new(), FixedMetadata::default());

        let err = catalog.create_song("G", "T").await.unwrap_err();

        assert!(matches!(err, CatalogError::ExternalService(_)));
        assert!(catalog.store().groups().await.is_empty());
        assert_eq!(catalog.store().song_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_never_exceeds_limit() {
        let catalog = catalog();
        for i in 0..7 {
            catalog.create_song("G", &format!("T{}", i)).await.unwrap();
        }

        let first = catalog.list_songs(&all(), 1, 3).await.unwrap();
        let last = catalog.list_songs(&all(), 3, 3).await.unwrap();
        let beyond = catalog.list_songs(&all(), 4, 3).await.unwrap();

        assert_eq!(first.songs.len(), 3);
        assert_eq!(last.songs.len(), 1);
        assert!(beyond.songs.is_empty());
        assert_eq!((last.page, last.limit), (3, 3));
    }

    #[tokio::test]
    async fn test_empty_filter_matches_unfiltered_listing() {
        let catalog = catalog();
        for i in 0..4 {
            catalog.create_song("G", &format!("T{}", i)).await.unwrap();
        }

        let blank = SongFilter {
            group_name: Some(String::new()),
            text: Some(String::new()),
            ..SongFilter::default()
        };
        let unfiltered = catalog.list_songs(&all(), 1, 10).await.unwrap();
        let filtered = catalog.list_songs(&blank, 1, 10).await.unwrap();

        assert_eq!(unfiltered.songs, filtered.songs);
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_pagination() {
        let catalog = catalog();
        assert!(catalog.list_songs(&all(), 0, 10).await.unwrap_err().is_validation());
        assert!(catalog.list_songs(&all(), 1, -1).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_get_verses_pages() {
        let catalog = catalog();
        let song = catalog.create_song("G", "T").await.unwrap();

        let page = catalog.get_verses(song.id, 1, 2).await.unwrap();
        assert_eq!(page.verses, vec!["A", "B"]);
        assert_eq!(page.total, 3);

        let page = catalog.get_verses(song.id, 2, 2).await.unwrap();
        assert_eq!(page.verses, vec!["C"]);
        assert_eq!(page.total, 3);

        assert!(catalog.get_verses(song.id, 3, 2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_verses_of_missing_song() {
        let catalog = catalog();
        let err = catalog.get_verses(42, 1, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "Song not found");
    }

    #[tokio::test]
    async fn test_get_verses_validates_before_lookup() {
        let catalog = catalog();
        assert!(catalog.get_verses(42, 0, 2).await.unwrap_err().is_validation());
        assert!(catalog.get_verses(42, 1, 0).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_empty_patch_always_succeeds() {
        let catalog = catalog();
        let song = catalog.create_song("G", "T").await.unwrap();

        catalog.update_song(song.id, &SongPatch::default()).await.unwrap();
        catalog.update_song(9999, &SongPatch::default()).await.unwrap();

        let listed = catalog.list_songs(&all(), 1, 10).await.unwrap();
        assert_eq!(listed.songs, vec![song]);
    }

    #[tokio::test]
    async fn test_patch_updates_only_present_fields() {
        let catalog = catalog();
        let song = catalog.create_song("G", "T").await.unwrap();

        let patch = SongPatch {
            text: Some(String::new()),
            release_date: Some("16.07.2006".to_string()),
            ..SongPatch::default()
        };
        catalog.update_song(song.id, &patch).await.unwrap();

        let listed = catalog.list_songs(&all(), 1, 10).await.unwrap().songs;
        assert_eq!(listed[0].title, "T");
        assert_eq!(listed[0].link, "L");
        assert_eq!(listed[0].text, "");
        assert_eq!(
            listed[0].release_date,
            NaiveDate::from_ymd_opt(2006, 7, 16).unwrap()
        );
    }

    #[tokio::test]
    async fn test_patch_on_missing_song_keeps_group_name() {
        let catalog = catalog();
        catalog.create_song("G", "T").await.unwrap();

        let patch = SongPatch {
            group: Some("X".to_string()),
            song: Some(String::new()),
            ..SongPatch::default()
        };
        let err = catalog.update_song(9999, &patch).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(catalog.store().groups().await[0].name, "G");
    }

    #[tokio::test]
    async fn test_group_patch_renames_shared_group() {
        let catalog = catalog();
        let first = catalog.create_song("G", "T1").await.unwrap();
        catalog.create_song("G", "T2").await.unwrap();

        let patch = SongPatch {
            group: Some("Renamed".to_string()),
            ..SongPatch::default()
        };
        catalog.update_song(first.id, &patch).await.unwrap();

        let listed = catalog.list_songs(&all(), 1, 10).await.unwrap().songs;
        assert!(listed.iter().all(|song| song.group == "Renamed"));
        assert_eq!(catalog.store().groups().await.len(), 1);
    }

    #[tokio::test]
    async fn test_patch_with_bad_date_is_validation_error() {
        let catalog = catalog();
        let song = catalog.create_song("G", "T").await.unwrap();

        let patch = SongPatch {
            release_date: Some(String::new()),
            ..SongPatch::default()
        };
        assert!(catalog.update_song(song.id, &patch).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_delete_then_absent_from_listing() {
        let catalog = catalog();
        let song = catalog.create_song("G", "T").await.unwrap();

        catalog.delete_song(song.id).await.unwrap();

        assert!(catalog.list_songs(&all(), 1, 10).await.unwrap().songs.is_empty());
        assert!(catalog.delete_song(song.id).await.unwrap_err().is_not_found());
    }
}

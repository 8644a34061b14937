use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::logic::{Assignment, ListingQuery, UpdatePlan};
use crate::model::{Group, Id, NewSong, Song};
use crate::store::traits::SongStore;

#[derive(Clone, Debug)]
struct SongRow {
    group_id: Id,
    title: String,
    release_date: NaiveDate,
    text: String,
    link: String,
}

#[derive(Clone, Debug, Default)]
struct Tables {
    groups: BTreeMap<Id, String>,
    songs: BTreeMap<Id, SongRow>,
    next_group_id: Id,
    next_song_id: Id,
}

impl Tables {
    fn song(&self, id: Id, row: &SongRow) -> Song {
        Song {
            id,
            group: self.groups.get(&row.group_id).cloned().unwrap_or_default(),
            title: row.title.clone(),
            release_date: row.release_date,
            text: row.text.clone(),
            link: row.link.clone(),
        }
    }

    fn find_or_create_group(&mut self, name: &str) -> Id {
        if let Some((id, _)) = self.groups.iter().find(|(_, existing)| existing.as_str() == name) {
            return *id;
        }
        self.next_group_id += 1;
        self.groups.insert(self.next_group_id, name.to_string());
        self.next_group_id
    }
}

/// In-process song store.
///
/// Every mutating operation works on a copy of the tables and swaps it in
/// only when the whole operation succeeded, which gives the same
/// all-or-nothing behaviour as a database transaction. Songs are listed in
/// id order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all group rows, in id order
    pub async fn groups(&self) -> Vec<Group> {
        let tables = self.tables.read().await;
        tables
            .groups
            .iter()
            .map(|(id, name)| Group {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    pub async fn song_count(&self) -> usize {
        self.tables.read().await.songs.len()
    }
}

#[async_trait::async_trait]
impl SongStore for MemoryStore {
    async fn list_songs(&self, query: &ListingQuery) -> Result<Vec<Song>> {
        let tables = self.tables.read().await;
        let pagination = query.pagination();

        let songs = tables
            .songs
            .iter()
            .map(|(id, row)| tables.song(*id, row))
            .filter(|song| query.matches(song))
            .skip(usize::try_from(pagination.offset())?)
            .take(usize::try_from(pagination.limit())?)
            .collect();

        Ok(songs)
    }

    async fn get_song_text(&self, id: Id) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.songs.get(&id).map(|row| row.text.clone()))
    }

    async fn create_song(&self, new_song: NewSong) -> Result<Song> {
        let mut tables = self.tables.write().await;
        let mut working = tables.clone();

        let group_id = working.find_or_create_group(&new_song.group);
        working.next_song_id += 1;
        let song_id = working.next_song_id;
        working.songs.insert(
            song_id,
            SongRow {
                group_id,
                title: new_song.title.clone(),
                release_date: new_song.details.release_date,
                text: new_song.details.text.clone(),
                link: new_song.details.link.clone(),
            },
        );

        *tables = working;
        Ok(new_song.into_song(song_id))
    }

    async fn apply_update(&self, id: Id, plan: &UpdatePlan) -> Result<bool> {
        if plan.is_empty() {
            return Ok(true);
        }

        let mut tables = self.tables.write().await;
        let mut working = tables.clone();

        if let Some(group_name) = &plan.group_name {
            let group_id = working.songs.get(&id).map(|row| row.group_id);
            if let Some(group_id) = group_id {
                if working
                    .groups
                    .iter()
                    .any(|(other, name)| *other != group_id && name == group_name)
                {
                    anyhow::bail!("Failed to update group: group name '{}' already exists", group_name);
                }
                working.groups.insert(group_id, group_name.clone());
            }
        }

        if plan.touches_song_row() {
            let Some(row) = working.songs.get_mut(&id) else {
                // working copy is discarded, group rename included
                return Ok(false);
            };
            for assignment in &plan.assignments {
                match assignment {
                    Assignment::Title(title) => row.title = title.clone(),
                    Assignment::ReleaseDate(date) => row.release_date = *date,
                    Assignment::Text(text) => row.text = text.clone(),
                    Assignment::Link(link) => row.link = link.clone(),
                }
            }
        }

        *tables = working;
        Ok(true)
    }

    async fn delete_song(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.songs.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

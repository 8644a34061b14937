use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Id,
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    pub release_date: NaiveDate, // serialized as YYYY-MM-DD
    pub text: String,
    pub link: String,
}

/// Performing group. Names are unique; songs reference groups by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
}

/// Fields supplied by the external metadata lookup when a song is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

/// Input model for inserting a song, before storage assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
    pub details: SongDetails,
}

impl NewSong {
    pub fn new(group: String, title: String, details: SongDetails) -> Self {
        Self {
            group,
            title,
            details,
        }
    }

    /// Convert to a full Song once the storage-assigned id is known
    pub fn into_song(self, id: Id) -> Song {
        Song {
            id,
            group: self.group,
            title: self.title,
            release_date: self.details.release_date,
            text: self.details.text,
            link: self.details.link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongPage {
    pub page: i64,
    pub limit: i64,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersePage {
    pub page: i64,
    pub limit: i64,
    pub verses: Vec<String>,
    /// Verse count of the whole song, not of this page
    pub total: usize,
}

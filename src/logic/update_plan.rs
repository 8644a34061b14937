use chrono::NaiveDate;

use crate::error::{CatalogError, CatalogResult};
use crate::logic::criteria::SqlParam;
use crate::model::{parse_release_date, SongPatch};

/// A single `column = value` assignment on the songs table.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Title(String),
    ReleaseDate(NaiveDate),
    Text(String),
    Link(String),
}

impl Assignment {
    pub fn column(&self) -> &'static str {
        match self {
            Assignment::Title(_) => "song",
            Assignment::ReleaseDate(_) => "release_date",
            Assignment::Text(_) => "text",
            Assignment::Link(_) => "link",
        }
    }

    pub fn param(&self) -> SqlParam {
        match self {
            Assignment::Title(value) | Assignment::Text(value) | Assignment::Link(value) => {
                SqlParam::Text(value.clone())
            }
            Assignment::ReleaseDate(date) => SqlParam::Date(*date),
        }
    }
}

/// Storage mutations derived from a sparse patch.
///
/// `group_name` renames the group row the song references; `assignments`
/// touch the song row itself, in the fixed order song, releaseDate, text,
/// link. Both halves must be applied inside one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePlan {
    pub group_name: Option<String>,
    pub assignments: Vec<Assignment>,
}

impl UpdatePlan {
    pub fn from_patch(patch: &SongPatch) -> CatalogResult<Self> {
        let mut assignments = Vec::new();

        if let Some(title) = &patch.song {
            assignments.push(Assignment::Title(title.clone()));
        }

        if let Some(release_date) = &patch.release_date {
            let date = parse_release_date(release_date).ok_or_else(|| {
                CatalogError::validation(format!("Invalid release date: {}", release_date))
            })?;
            assignments.push(Assignment::ReleaseDate(date));
        }

        if let Some(text) = &patch.text {
            assignments.push(Assignment::Text(text.clone()));
        }

        if let Some(link) = &patch.link {
            assignments.push(Assignment::Link(link.clone()));
        }

        Ok(Self {
            group_name: patch.group.clone(),
            assignments,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.group_name.is_none() && self.assignments.is_empty()
    }

    pub fn touches_song_row(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// `UPDATE songs SET ... WHERE id = $n`, or `None` when no song column changes.
    /// The song id is the last parameter, after `song_params()`.
    pub fn song_update_sql(&self) -> Option<String> {
        if !self.touches_song_row() {
            return None;
        }

        let assignments: Vec<String> = self
            .assignments
            .iter()
            .enumerate()
            .map(|(index, assignment)| format!("{} = ${}", assignment.column(), index + 1))
            .collect();

        Some(format!(
            "UPDATE songs SET {} WHERE id = ${}",
            assignments.join(", "),
            self.assignments.len() + 1
        ))
    }

    pub fn song_params(&self) -> Vec<SqlParam> {
        self.assignments.iter().map(Assignment::param).collect()
    }
}

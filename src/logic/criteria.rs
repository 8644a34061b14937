use chrono::NaiveDate;
use log::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{parse_release_date, Pagination, Song, SongFilter};

/// Song attributes a listing can be constrained on, with the column each one
/// maps to in the `songs s JOIN groups g` listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongColumn {
    GroupName,
    Title,
    ReleaseDate,
    Text,
    Link,
}

impl SongColumn {
    pub fn sql(&self) -> &'static str {
        match self {
            SongColumn::GroupName => "g.name",
            SongColumn::Title => "s.song",
            SongColumn::ReleaseDate => "s.release_date",
            SongColumn::Text => "s.text",
            SongColumn::Link => "s.link",
        }
    }

    fn text_of<'a>(&self, song: &'a Song) -> Option<&'a str> {
        match self {
            SongColumn::GroupName => Some(&song.group),
            SongColumn::Title => Some(&song.title),
            SongColumn::Text => Some(&song.text),
            SongColumn::Link => Some(&song.link),
            SongColumn::ReleaseDate => None,
        }
    }
}

/// Positional parameter value. Bound in the order it appears in a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Date(NaiveDate),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match; the needle is matched literally.
    Contains { column: SongColumn, needle: String },
    DateEquals { column: SongColumn, date: NaiveDate },
}

impl Predicate {
    fn render(&self, placeholder: usize) -> String {
        match self {
            Predicate::Contains { column, .. } => {
                format!("{} ILIKE ${}", column.sql(), placeholder)
            }
            Predicate::DateEquals { column, .. } => {
                format!("{} = ${}", column.sql(), placeholder)
            }
        }
    }

    fn param(&self) -> SqlParam {
        match self {
            Predicate::Contains { needle, .. } => {
                SqlParam::Text(format!("%{}%", escape_like(needle)))
            }
            Predicate::DateEquals { date, .. } => SqlParam::Date(*date),
        }
    }

    /// Evaluate the predicate against an already materialized song.
    pub fn matches(&self, song: &Song) -> bool {
        match self {
            Predicate::Contains { column, needle } => column
                .text_of(song)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Predicate::DateEquals { date, .. } => song.release_date == *date,
        }
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Filtered, paginated listing query.
///
/// Predicates are kept in append order (group, song, releaseDate, text,
/// link). Placeholders are numbered in that same order and the limit and
/// offset parameters always come last, so `params()` lines up with the
/// rendered SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    predicates: Vec<Predicate>,
    pagination: Pagination,
}

impl ListingQuery {
    pub fn build(filter: &SongFilter, page: i64, limit: i64) -> CatalogResult<Self> {
        let pagination = Pagination::new(page, limit)?;
        let mut predicates = Vec::new();

        if let Some(group) = present(&filter.group_name) {
            debug!("Adding filter for group name: {}", group);
            predicates.push(Predicate::Contains {
                column: SongColumn::GroupName,
                needle: group.to_string(),
            });
        }

        if let Some(song) = present(&filter.song) {
            debug!("Adding filter for song: {}", song);
            predicates.push(Predicate::Contains {
                column: SongColumn::Title,
                needle: song.to_string(),
            });
        }

        if let Some(release_date) = present(&filter.release_date) {
            let date = parse_release_date(release_date).ok_or_else(|| {
                CatalogError::validation(format!("Invalid release date: {}", release_date))
            })?;
            debug!("Adding filter for release date: {}", date);
            predicates.push(Predicate::DateEquals {
                column: SongColumn::ReleaseDate,
                date,
            });
        }

        if let Some(text) = present(&filter.text) {
            debug!("Adding filter for text: {}", text);
            predicates.push(Predicate::Contains {
                column: SongColumn::Text,
                needle: text.to_string(),
            });
        }

        if let Some(link) = present(&filter.link) {
            debug!("Adding filter for link: {}", link);
            predicates.push(Predicate::Contains {
                column: SongColumn::Link,
                needle: link.to_string(),
            });
        }

        Ok(Self {
            predicates,
            pagination,
        })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn matches(&self, song: &Song) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(song))
    }

    pub fn where_clause(&self) -> String {
        let mut clause = String::from("WHERE 1=1");
        for (index, predicate) in self.predicates.iter().enumerate() {
            clause.push_str(" AND ");
            clause.push_str(&predicate.render(index + 1));
        }
        clause
    }

    pub fn bounds_clause(&self) -> String {
        let next = self.predicates.len() + 1;
        format!("LIMIT ${} OFFSET ${}", next, next + 1)
    }

    pub fn params(&self) -> Vec<SqlParam> {
        let mut params: Vec<SqlParam> = self.predicates.iter().map(Predicate::param).collect();
        params.push(SqlParam::Int(self.pagination.limit()));
        params.push(SqlParam::Int(self.pagination.offset()));
        params
    }

    /// Append the filter and bounds clauses to a `SELECT ... FROM ...` prefix.
    pub fn to_sql(&self, select: &str) -> String {
        format!("{} {} {}", select, self.where_clause(), self.bounds_clause())
    }
}

use crate::error::CatalogError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SONG_LIMIT: i64 = 10;
pub const DEFAULT_VERSE_LIMIT: i64 = 2;

/// Sparse listing criteria. A missing or empty field places no constraint
/// on the listing; it never means "match empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub group_name: Option<String>,
    pub song: Option<String>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongFilter {
    pub fn is_empty(&self) -> bool {
        [
            &self.group_name,
            &self.song,
            &self.release_date,
            &self.text,
            &self.link,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

/// Validated page/limit pair shared by song listings and verse pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Result<Self, CatalogError> {
        if page < 1 {
            return Err(CatalogError::validation("Invalid page number"));
        }
        if limit < 1 {
            return Err(CatalogError::validation("Invalid limit number"));
        }
        // offset must stay representable for the storage bounds parameter
        if (page - 1).checked_mul(limit).is_none() {
            return Err(CatalogError::validation("Page is out of range"));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

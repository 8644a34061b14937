use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CatalogError;
use crate::logic::SongCatalog;
use crate::metadata::MetadataClient;
use crate::model::{
    Id, Song, SongFilter, SongPage, SongPatch, VersePage, DEFAULT_PAGE, DEFAULT_SONG_LIMIT,
    DEFAULT_VERSE_LIMIT,
};
use crate::store::traits::SongStore;

pub type AppState<S, M> = Arc<SongCatalog<S, M>>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Query string of `GET /songs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSongsQuery {
    #[serde(alias = "group")]
    pub group_name: Option<String>,
    pub song: Option<String>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListSongsQuery {
    fn into_parts(self) -> (SongFilter, i64, i64) {
        let filter = SongFilter {
            group_name: self.group_name,
            song: self.song,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        };
        (
            filter,
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_SONG_LIMIT),
        )
    }
}

/// Query string of `GET /songs/:id/text`
#[derive(Debug, Default, Deserialize)]
pub struct VerseQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    pub group: Option<String>,
    pub song: Option<String>,
}

/// Map a catalog error to a status code and `{error}` body.
///
/// Storage and upstream failures answer with `failure` and log the full
/// cause chain instead of exposing it to the caller.
pub fn error_response(err: CatalogError, failure: &str) -> ApiError {
    let (status, message) = match &err {
        CatalogError::Validation(message) => (StatusCode::BAD_REQUEST, message.as_str()),
        CatalogError::NotFound(message) => (StatusCode::NOT_FOUND, message.as_str()),
        CatalogError::Storage(_) => {
            error!("{}: {}", failure, err);
            (StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
        CatalogError::ExternalService(_) => {
            error!("{}: {}", EXTERNAL_FAILURE, err);
            (StatusCode::BAD_GATEWAY, EXTERNAL_FAILURE)
        }
    };
    (status, Json(ErrorResponse::new(message)))
}

const EXTERNAL_FAILURE: &str = "Failed to call external API";

/// Turn an extractor rejection into a 400 with the usual `{error}` body
fn invalid_input(message: &str, rejection: impl std::fmt::Display) -> ApiError {
    warn!("{}: {}", message, rejection);
    error_response(CatalogError::validation(message), message)
}

pub async fn health_check<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(e) = catalog.health().await {
        error!("Health check failed: {}", e);
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Database unavailable")),
        ));
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn list_songs<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> Result<Json<SongPage>, ApiError> {
    let Query(query) = query.map_err(|e| invalid_input("Invalid query parameters", e))?;
    let (filter, page, limit) = query.into_parts();
    catalog
        .list_songs(&filter, page, limit)
        .await
        .map(Json)
        .map_err(|e| error_response(e, "Failed to retrieve songs"))
}

pub async fn get_song_text<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
    id: Result<Path<Id>, PathRejection>,
    query: Result<Query<VerseQuery>, QueryRejection>,
) -> Result<Json<VersePage>, ApiError> {
    let Path(id) = id.map_err(|e| invalid_input("Invalid song ID", e))?;
    let Query(query) = query.map_err(|e| invalid_input("Invalid query parameters", e))?;
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_VERSE_LIMIT);
    info!("Pagination params received: page = {}, limit = {}", page, limit);

    catalog
        .get_verses(id, page, limit)
        .await
        .map(Json)
        .map_err(|e| error_response(e, "Failed to retrieve song text"))
}

pub async fn create_song<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
    request: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    let Json(request) = request.map_err(|e| invalid_input("Invalid JSON data", e))?;
    let group = request.group.unwrap_or_default();
    let title = request.song.unwrap_or_default();

    let song = catalog
        .create_song(&group, &title)
        .await
        .map_err(|e| error_response(e, "Failed to store the song"))?;

    Ok((StatusCode::CREATED, Json(song)))
}

pub async fn update_song<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
    id: Result<Path<Id>, PathRejection>,
    patch: Result<Json<SongPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(|e| invalid_input("Invalid song ID", e))?;
    let Json(patch) = patch.map_err(|e| invalid_input("Invalid JSON data", e))?;
    catalog
        .update_song(id, &patch)
        .await
        .map_err(|e| error_response(e, "Failed to update song"))?;

    Ok(Json(MessageResponse::new("Song updated successfully")))
}

pub async fn delete_song<S: SongStore, M: MetadataClient>(
    State(catalog): State<AppState<S, M>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(|e| invalid_input("Invalid song ID", e))?;
    catalog
        .delete_song(id)
        .await
        .map_err(|e| error_response(e, "Failed to delete song"))?;

    Ok(Json(MessageResponse::new("Song deleted successfully")))
}

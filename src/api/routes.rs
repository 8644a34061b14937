use axum::{
    routing::{get, put},
    Router,
};

use crate::api::{docs, handlers, handlers::AppState};
use crate::metadata::MetadataClient;
use crate::store::traits::SongStore;

pub fn create_router<S, M>() -> Router<AppState<S, M>>
where
    S: SongStore + 'static,
    M: MetadataClient + 'static,
{
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check::<S, M>))
        // API Documentation
        .route("/swagger", get(docs::get_api_docs))
        .route("/docs/openapi.json", get(docs::get_openapi_spec))
        // Songs
        .route(
            "/songs",
            get(handlers::list_songs::<S, M>).post(handlers::create_song::<S, M>),
        )
        .route(
            "/songs/:id",
            put(handlers::update_song::<S, M>)
                .patch(handlers::update_song::<S, M>)
                .delete(handlers::delete_song::<S, M>),
        )
        .route("/songs/:id/text", get(handlers::get_song_text::<S, M>))
}

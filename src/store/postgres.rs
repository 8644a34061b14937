use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};

use crate::logic::{ListingQuery, SqlParam, UpdatePlan};
use crate::model::{Id, NewSong, Song};
use crate::store::traits::SongStore;

const LIST_SONGS_SELECT: &str = "SELECT s.id, g.name AS group_name, s.song, s.release_date, s.text, s.link \
     FROM songs s JOIN groups g ON g.id = s.group_id";

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// Bind positional parameters in list order.
fn bind_params<'q>(mut query: PgQuery<'q>, params: &'q [SqlParam]) -> PgQuery<'q> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Date(date) => query.bind(*date),
            SqlParam::Int(value) => query.bind(*value),
        };
    }
    query
}

fn song_from_row(row: &PgRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        group: row.try_get("group_name")?,
        title: row.try_get("song")?,
        release_date: row.try_get("release_date")?,
        text: row.try_get("text")?,
        link: row.try_get("link")?,
    })
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl SongStore for PostgresStore {
    async fn list_songs(&self, query: &ListingQuery) -> Result<Vec<Song>> {
        let sql = query.to_sql(LIST_SONGS_SELECT);
        let params = query.params();
        debug!("Listing songs: {} with parameters: {:?}", sql, params);

        let rows = bind_params(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .context("Failed to retrieve songs")?;

        rows.iter()
            .map(|row| song_from_row(row).context("Failed to scan song"))
            .collect()
    }

    async fn get_song_text(&self, id: Id) -> Result<Option<String>> {
        let text = sqlx::query_scalar::<_, String>("SELECT text FROM songs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to retrieve song text")?;

        Ok(text)
    }

    async fn create_song(&self, new_song: NewSong) -> Result<Song> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let existing = sqlx::query_scalar::<_, Id>("SELECT id FROM groups WHERE name = $1")
            .bind(new_song.group.as_str())
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to check if group exists")?;

        let group_id = match existing {
            Some(group_id) => group_id,
            None => {
                debug!("Group not found, adding new group: {}", new_song.group);
                // A concurrent insert of the same name blocks here until it
                // commits, then the existing row's id is returned.
                sqlx::query_scalar::<_, Id>(
                    r#"
                    INSERT INTO groups (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id
                    "#,
                )
                .bind(new_song.group.as_str())
                .fetch_one(&mut *tx)
                .await
                .context("Failed to insert group into database")?
            }
        };

        let song_id = sqlx::query_scalar::<_, Id>(
            r#"
            INSERT INTO songs (group_id, song, release_date, text, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(group_id)
        .bind(new_song.title.as_str())
        .bind(new_song.details.release_date)
        .bind(new_song.details.text.as_str())
        .bind(new_song.details.link.as_str())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert song into database")?;

        tx.commit().await.context("Failed to commit transaction")?;
        debug!("Song {} stored with group id {}", song_id, group_id);

        Ok(new_song.into_song(song_id))
    }

    async fn apply_update(&self, id: Id, plan: &UpdatePlan) -> Result<bool> {
        if plan.is_empty() {
            return Ok(true);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        if let Some(group_name) = &plan.group_name {
            let result = sqlx::query(
                "UPDATE groups SET name = $1 WHERE id = (SELECT group_id FROM songs WHERE id = $2)",
            )
            .bind(group_name.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to update group")?;
            debug!("Group rename affected {} rows", result.rows_affected());
        }

        if let Some(sql) = plan.song_update_sql() {
            let params = plan.song_params();
            debug!("Prepared update query: {} with parameters: {:?}", sql, params);

            let result = bind_params(sqlx::query(&sql), &params)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to update song")?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .context("Failed to roll back transaction")?;
                return Ok(false);
            }
        }

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(true)
    }

    async fn delete_song(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete song from database")?;

        debug!("Number of affected rows: {}", result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SongFilter;

    #[test]
    fn test_listing_sql_joins_groups() {
        let filter = SongFilter {
            group_name: Some("muse".to_string()),
            ..SongFilter::default()
        };
        let query = ListingQuery::build(&filter, 1, 10).unwrap();

        assert_eq!(
            query.to_sql(LIST_SONGS_SELECT),
            "SELECT s.id, g.name AS group_name, s.song, s.release_date, s.text, s.link \
             FROM songs s JOIN groups g ON g.id = s.group_id \
             WHERE 1=1 AND g.name ILIKE $1 LIMIT $2 OFFSET $3"
        );
    }
}

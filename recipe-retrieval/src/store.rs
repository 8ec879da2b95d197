//! Candidate store: resolves recipe ids into rows and persists image
//! backfills.
//!
//! Every call checks a connection out of the pool for its own duration
//! only; it returns to the pool on every exit path when dropped.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument, warn};

use crate::errors::retrieval_error::RetrievalError;
use crate::structs::retrieval_config::StoreConfig;
use crate::structs::stored_recipe::StoredRecipe;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Fetch the rows for `ids`. Duplicates are queried once; order is
    /// unspecified.
    async fn fetch(&self, ids: &[i64]) -> Result<Vec<StoredRecipe>, RetrievalError>;

    /// Persist an image URL for one recipe, transactionally.
    async fn update_image_url(&self, id: i64, url: &str) -> Result<(), RetrievalError>;
}

/// Drop repeated ids, keeping first-seen order.
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

const RECIPE_FIELDS: &str = "id::bigint AS id, \
    COALESCE(name, '') AS name, \
    COALESCE(description, '') AS description, \
    COALESCE(instructions::text[], '{}') AS instructions, \
    COALESCE(main_ingredients::text[], '{}') AS main_ingredients, \
    COALESCE(tags::text[], '{}') AS tags, \
    COALESCE(nutrition::text[], '{}') AS nutrition, \
    COALESCE(total_time::text, '') AS total_time, \
    image_url, \
    COALESCE(ingredients_tokenized::text[], '{}') AS ingredients_tokenized, \
    COALESCE(data_source, '') AS data_source";

/// Postgres `recipes` table.
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    /// Build a lazily connecting pool; the first query opens a connection.
    ///
    /// # Errors
    /// `InvalidConfig` if the connection string cannot be parsed.
    pub fn connect_lazy(cfg: &StoreConfig) -> Result<Self, RetrievalError> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_lazy(&cfg.database_url)
            .map_err(|e| RetrievalError::InvalidConfig(format!("DATABASE_URL: {e}")))?;
        info!(
            target: "recipe_retrieval::store",
            max_connections = cfg.max_connections,
            "recipe store pool created"
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    #[instrument(target = "recipe_retrieval::store", skip_all, fields(requested = ids.len()))]
    async fn fetch(&self, ids: &[i64]) -> Result<Vec<StoredRecipe>, RetrievalError> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.acquire().await?;
        let sql = format!("SELECT {RECIPE_FIELDS} FROM recipes WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, StoredRecipe>(&sql)
            .bind(&ids)
            .fetch_all(&mut *conn)
            .await?;

        debug!(
            target: "recipe_retrieval::store",
            unique = ids.len(),
            found = rows.len(),
            "candidates fetched"
        );
        Ok(rows)
    }

    #[instrument(target = "recipe_retrieval::store", skip(self, url))]
    async fn update_image_url(&self, id: i64, url: &str) -> Result<(), RetrievalError> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("UPDATE recipes SET image_url = $1 WHERE id = $2")
            .bind(url)
            .bind(id)
            .execute(&mut *tx)
            .await;

        match res {
            Ok(done) => {
                tx.commit().await?;
                debug!(
                    target: "recipe_retrieval::store",
                    rows = done.rows_affected(),
                    "image url persisted"
                );
                Ok(())
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(target: "recipe_retrieval::store", error = %rb, "rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_ids(&[5, 3, 5, 9, 3, 3]), vec![5, 3, 9]);
        assert!(dedup_ids(&[]).is_empty());
    }

    #[test]
    fn select_list_names_every_row_field() {
        for field in [
            "id",
            " name",
            "description",
            "instructions",
            "main_ingredients",
            "tags",
            "nutrition",
            "total_time",
            "image_url",
            "ingredients_tokenized",
            "data_source",
        ] {
            assert!(RECIPE_FIELDS.contains(field), "missing {field}");
        }
    }

    #[tokio::test]
    async fn bad_database_url_is_a_config_error() {
        let cfg = StoreConfig {
            database_url: "definitely not a url".into(),
            max_connections: 1,
        };
        assert!(matches!(
            PgRecipeStore::connect_lazy(&cfg),
            Err(RetrievalError::InvalidConfig(_))
        ));
    }
}

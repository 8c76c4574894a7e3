use std::str::FromStr;

use async_trait::async_trait;
use bbs_types::{NewPost, Post};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::MonotonicClock;
use crate::error::PostStoreResult;
use crate::traits::PostStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    body TEXT NOT NULL,
    imageurl TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
)";

/// SQLite-backed post store.
///
/// The table is created on connect. Insertion order is the `id` order.
/// Stamping and inserting happen under one lock, so `created_at` never
/// decreases along `id` even when inserts race across pooled connections.
#[derive(Debug)]
pub struct SqlitePostStore {
    pool: SqlitePool,
    clock: MonotonicClock,
    write_lock: Mutex<()>,
}

impl SqlitePostStore {
    /// Connect to `url`, e.g. `sqlite:bbs.db` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> PostStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to `:memory:` is its own database, so pin the pool
        // to a single connection that is never recycled.
        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        sqlx::query(SCHEMA).execute(&pool).await?;
        info!(url, "SQLite post store ready");
        Ok(Self {
            pool,
            clock: MonotonicClock::new(),
            write_lock: Mutex::new(()),
        })
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn post_from_row(row: &SqliteRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        name: row.try_get("name")?,
        body: row.try_get("body")?,
        image_url: row.try_get("imageurl")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn insert(&self, post: NewPost) -> PostStoreResult<Post> {
        let _guard = self.write_lock.lock().await;
        let row = sqlx::query(
            "INSERT INTO posts (name, body, imageurl, created_at) VALUES (?, ?, ?, ?) \
             RETURNING id, name, body, imageurl, created_at",
        )
        .bind(&post.name)
        .bind(&post.body)
        .bind(&post.image_url)
        .bind(self.clock.now())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.try_get("id")?;
        debug!(id, "post row inserted");
        Ok(post_from_row(&row)?)
    }

    async fn all(&self) -> PostStoreResult<Vec<Post>> {
        let rows = sqlx::query("SELECT name, body, imageurl, created_at FROM posts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let posts = rows
            .iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn close(&self) -> PostStoreResult<()> {
        self.pool.close().await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn store() -> SqlitePostStore {
        SqlitePostStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let store = store().await;
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_returns_persisted_row() {
        let store = store().await;
        let post = store
            .insert(NewPost::new("dog", "bowwow").with_image_url("memory://dog.jpeg"))
            .await
            .unwrap();
        assert_eq!(post.name, "dog");
        assert_eq!(post.body, "bowwow");
        assert_eq!(post.image_url, "memory://dog.jpeg");

        let all = store.all().await.unwrap();
        assert_eq!(all, vec![post]);
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = store().await;
        for name in ["a", "b", "c", "d"] {
            store.insert(NewPost::new(name, "body")).await.unwrap();
        }
        let names: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("posts.db").display());

        let first = SqlitePostStore::connect(&url).await.unwrap();
        first.insert(NewPost::new("kept", "across")).await.unwrap();
        first.close().await.unwrap();

        let second = SqlitePostStore::connect(&url).await.unwrap();
        let all = second.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "kept");
        second.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_inserts_keep_timestamps_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("posts.db").display());
        let store = Arc::new(SqlitePostStore::connect(&url).await.unwrap());

        for round in 0..10 {
            let handles: Vec<_> = (0..32)
                .map(|i| {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        store
                            .insert(NewPost::new(format!("r{round}n{i}"), "b"))
                            .await
                            .unwrap()
                    })
                })
                .collect();
            for h in handles {
                h.await.unwrap();
            }
        }

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 320);
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        store.close().await.unwrap();
    }

    #[test]
    fn memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:x?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:bbs.db"));
    }
}

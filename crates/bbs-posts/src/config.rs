use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PostStoreError, PostStoreResult};
use crate::memory::InMemoryPostStore;
use crate::mysql::MySqlPostStore;
use crate::sqlite::SqlitePostStore;
use crate::traits::PostStore;

/// Post store selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum PostStoreConfig {
    Memory,
    Sqlite {
        url: String,
    },
    Mysql {
        url: String,
        /// Create the `posts` table on startup if it is missing.
        #[serde(default)]
        create_schema: bool,
    },
}

impl Default for PostStoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            url: "sqlite:bbs.db".to_string(),
        }
    }
}

impl PostStoreConfig {
    /// Pick a backend from a connection string: `memory`, `sqlite:...`, or
    /// `mysql://...`.
    pub fn from_url(url: &str) -> PostStoreResult<Self> {
        let url = url.trim();
        if url.eq_ignore_ascii_case("memory") {
            Ok(Self::Memory)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite {
                url: url.to_string(),
            })
        } else if url.starts_with("mysql:") {
            Ok(Self::Mysql {
                url: url.to_string(),
                create_schema: false,
            })
        } else {
            Err(PostStoreError::InvalidUrl(redact(url)))
        }
    }

    /// The same selection with credentials stripped from any URL, for display.
    pub fn redacted(&self) -> Self {
        match self {
            Self::Memory => Self::Memory,
            Self::Sqlite { url } => Self::Sqlite { url: redact(url) },
            Self::Mysql { url, create_schema } => Self::Mysql {
                url: redact(url),
                create_schema: *create_schema,
            },
        }
    }

    /// Open the configured backend as a shared handle.
    pub async fn open(&self) -> PostStoreResult<Arc<dyn PostStore>> {
        let store: Arc<dyn PostStore> = match self {
            Self::Memory => Arc::new(InMemoryPostStore::new()),
            Self::Sqlite { url } => Arc::new(SqlitePostStore::connect(url).await?),
            Self::Mysql { url, create_schema } => {
                let store = MySqlPostStore::connect(url).await?;
                if *create_schema {
                    store.ensure_schema().await?;
                }
                Arc::new(store)
            }
        };
        Ok(store)
    }
}

/// Strip credentials before a URL ends up in an error message.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://[REDACTED]{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}

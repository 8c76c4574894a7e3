use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest attachment accepted by default: 2 MiB.
pub const DEFAULT_MAX_ATTACHMENT_SIZE: u64 = 2 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Attachments whose declared size exceeds this are rejected unread.
    pub max_attachment_size: u64,
    /// Deadline for the post store insert. `None` leaves it to the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_attachment_size: DEFAULT_MAX_ATTACHMENT_SIZE,
            insert_timeout_secs: None,
        }
    }
}

impl IngestConfig {
    pub fn insert_timeout(&self) -> Option<Duration> {
        self.insert_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = IngestConfig::default();
        assert_eq!(c.max_attachment_size, 2_097_152);
        assert!(c.insert_timeout().is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: IngestConfig = toml::from_str("insert_timeout_secs = 5").unwrap();
        assert_eq!(c.max_attachment_size, DEFAULT_MAX_ATTACHMENT_SIZE);
        assert_eq!(c.insert_timeout(), Some(Duration::from_secs(5)));
    }
}

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum length of an object name in bytes.
pub const MAX_OBJECT_NAME_LEN: usize = 255;

/// Name of a blob in the blob store.
///
/// Names are flat: no path separators, no relative components, nothing a
/// filesystem or object-store key would interpret. Every backend can use the
/// name verbatim as a file name or key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName(String);

impl ObjectName {
    /// Generate a fresh name of the form `<uuid-v4>.<extension>`.
    ///
    /// The identifier carries 122 random bits drawn from the operating
    /// system. Failure to obtain randomness is reported rather than falling
    /// back to a weaker source or an empty name.
    pub fn random(extension: &str) -> Result<Self, TypeError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TypeError::Randomness(e.to_string()))?;
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();

        if extension.is_empty() {
            Self::parse(id.to_string())
        } else {
            Self::parse(format!("{id}.{extension}"))
        }
    }

    /// Validate an existing name.
    pub fn parse(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let reject = |reason| TypeError::InvalidObjectName {
            name: name.clone(),
            reason,
        };

        if name.is_empty() {
            return Err(reject("name is empty"));
        }
        if name.len() > MAX_OBJECT_NAME_LEN {
            return Err(reject("name is too long"));
        }
        if name == "." || name == ".." {
            return Err(reject("name is a relative path component"));
        }
        if name.starts_with('.') {
            return Err(reject("name must not start with '.'"));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(reject("name contains a path separator or NUL"));
        }
        if name.chars().any(char::is_control) {
            return Err(reject("name contains control characters"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `.`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Debug for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectName({})", self.0)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ObjectName> for String {
    fn from(name: ObjectName) -> Self {
        name.0
    }
}

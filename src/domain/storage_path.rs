use std::fmt;

use uuid::Uuid;

/// Location of a staged audio file inside the shared staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// A collision-free staged name, independent of any client-supplied
    /// filename. `extension` includes the leading dot.
    pub fn staged(extension: &str) -> Self {
        Self(format!("{}{}", Uuid::new_v4(), extension))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::ObjectKey;

/// A destination prefix inside the bucket.
///
/// A non-empty prefix always ends with exactly one `/` and never starts with
/// one, so keys built from it are valid [`ObjectKey`]s. The empty prefix is the
/// bucket root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// The bucket root
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Normalize a raw prefix: trim whitespace, convert `\` to `/`, drop
    /// leading and trailing slashes and re-add a single trailing one.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().replace('\\', "/");
        let trimmed = normalized.trim_matches('/');

        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        if trimmed.contains("//") {
            return Err(ValidationError::PrefixContainsDoubleSlash(raw.to_string()));
        }

        Ok(Self(format!("{}/", trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate two prefixes, `self` first
    pub fn join(&self, other: &KeyPrefix) -> KeyPrefix {
        KeyPrefix(format!("{}{}", self.0, other.0))
    }

    /// Build the key of an object stored directly under this prefix
    pub fn key_for(&self, file_name: &str) -> Result<ObjectKey, ValidationError> {
        ObjectKey::new(format!("{}{}", self.0, file_name))
    }
}

impl std::fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

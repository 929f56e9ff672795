use crate::domain::errors::ValidationError;

/// Maximum key length accepted by S3-compatible stores
pub const MAX_KEY_LEN: usize = 1024;

/// A validated object key (path) in the bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        if let Some(c) = value.chars().find(|c| *c == '\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter(c));
        }

        if value.starts_with('/') {
            return Err(ValidationError::ObjectKeyStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::ObjectKeyContainsDoubleSlash);
        }

        Ok(Self(value))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a literal suffix such as `.gz` to the key
    pub fn with_suffix(&self, suffix: &str) -> Result<ObjectKey, ValidationError> {
        ObjectKey::new(format!("{}{}", self.0, suffix))
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_object_key() {
        assert!(ObjectKey::new("file.txt".to_string()).is_ok());
        assert!(ObjectKey::new("folder/file.txt".to_string()).is_ok());
        assert!(ObjectKey::new("host/backups/deep/file.txt.gz".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_object_key() {
        assert!(ObjectKey::new("".to_string()).is_err());
        assert!(ObjectKey::new("/leading-slash".to_string()).is_err());
        assert!(ObjectKey::new("double//slash".to_string()).is_err());
        assert!(ObjectKey::new("null\0byte".to_string()).is_err());
        assert!(ObjectKey::new("x".repeat(1025)).is_err());
    }

    #[test]
    fn test_backslash_is_an_ordinary_character() {
        let key = ObjectKey::new("backups/we\\ird.txt".to_string()).unwrap();
        assert_eq!(key.as_str(), "backups/we\\ird.txt");
    }

    #[test]
    fn test_with_suffix() {
        let key = ObjectKey::new("backups/logs/app.log".to_string()).unwrap();
        let gz = key.with_suffix(".gz").unwrap();
        assert_eq!(gz.as_str(), "backups/logs/app.log.gz");
    }
}

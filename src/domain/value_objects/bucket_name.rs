use crate::domain::errors::ValidationError;

/// A validated bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Create a new BucketName with S3 naming rules
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let value = value.trim().to_string();

        if value.len() < 3 {
            return Err(ValidationError::BucketNameTooShort {
                actual: value.len(),
                min: 3,
            });
        }

        if value.len() > 63 {
            return Err(ValidationError::BucketNameTooLong {
                actual: value.len(),
                max: 63,
            });
        }

        // Must start and end with lowercase letter or number
        if !value
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ValidationError::BucketNameInvalidStart);
        }

        if !value
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ValidationError::BucketNameInvalidEnd);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                return Err(ValidationError::BucketNameInvalidCharacter(c));
            }
        }

        if value.contains("--") {
            return Err(ValidationError::BucketNameConsecutiveHyphens);
        }

        if value.contains("..") {
            return Err(ValidationError::BucketNameConsecutiveDots);
        }

        if Self::looks_like_ip_address(&value) {
            return Err(ValidationError::BucketNameLooksLikeIpAddress);
        }

        Ok(Self(value))
    }

    /// Name reported by the in-memory backend
    pub fn local() -> Self {
        Self("local-backup".to_string())
    }

    /// Get the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `s3://bucket/key` form used in logs and upload results
    pub fn url_for(&self, key: &str) -> String {
        format!("s3://{}/{}", self.0, key)
    }

    fn looks_like_ip_address(s: &str) -> bool {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return false;
        }

        parts.iter().all(|part| part.parse::<u8>().is_ok())
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_bucket_is_valid() {
        assert_eq!(BucketName::new(BucketName::local().to_string()).unwrap(), BucketName::local());
    }

    #[test]
    fn test_valid_bucket_names() {
        assert!(BucketName::new("my-bucket".to_string()).is_ok());
        assert!(BucketName::new("bucket123".to_string()).is_ok());
        assert!(BucketName::new("backups.example.com".to_string()).is_ok());
        assert_eq!(
            BucketName::new("  padded-bucket ".to_string()).unwrap().as_str(),
            "padded-bucket"
        );
    }

    #[test]
    fn test_invalid_bucket_names() {
        assert!(BucketName::new("ab".to_string()).is_err());
        assert!(BucketName::new("a".repeat(64)).is_err());
        assert!(BucketName::new("-bucket".to_string()).is_err());
        assert!(BucketName::new("bucket-".to_string()).is_err());
        assert!(BucketName::new("Bucket".to_string()).is_err());
        assert!(BucketName::new("my_bucket".to_string()).is_err());
        assert!(BucketName::new("my--bucket".to_string()).is_err());
        assert!(BucketName::new("my..bucket".to_string()).is_err());
        assert!(BucketName::new("192.168.1.1".to_string()).is_err());
    }

    #[test]
    fn test_url_for() {
        let bucket = BucketName::new("my-bucket".to_string()).unwrap();
        assert_eq!(bucket.url_for("backups/a.txt"), "s3://my-bucket/backups/a.txt");
    }
}

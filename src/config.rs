//! YAML backup configuration.
//!
//! ```yaml
//! aws:
//!   s3BucketName: my-bucket
//!   region: us-east-1
//! backup:
//!   defaultS3StorageClass: STANDARD_IA
//!   prependHostnameToDest: true
//!   folders:
//!     - src: /data/app/
//!       dest: app/
//!       gzip: true
//!   globalExcludes:
//!     - "**/node_modules/"
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{
        errors::ValidationError,
        models::BackupFolderDeclaration,
        value_objects::{BucketName, KeyPrefix},
    },
    services::exclusion::ExclusionMatcher,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no backup folders configured")]
    NoFolders,

    #[error("source for folder {index} is blank")]
    BlankSource { index: usize },

    #[error("destination for folder {index} is blank")]
    BlankDestination { index: usize },

    #[error("invalid destination for folder {index}: {reason}")]
    InvalidDestination {
        index: usize,
        #[source]
        reason: ValidationError,
    },

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid bucket name: {0}")]
    InvalidBucket(#[source] ValidationError),

    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        prefix: String,
        #[source]
        reason: ValidationError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfig {
    #[serde(default)]
    pub aws: AwsSection,
    #[serde(default)]
    pub backup: BackupSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSection {
    #[serde(default)]
    pub s3_bucket_name: String,
    /// Accepted for compatibility; credentials come from the environment chain
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub allow_http: bool,
    /// Older layout kept the default storage class next to the bucket
    #[serde(default)]
    pub default_s3_storage_class: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSection {
    #[serde(default)]
    pub default_s3_storage_class: Option<String>,
    #[serde(default)]
    pub default_prefix_to_prepend: String,
    #[serde(default)]
    pub prepend_hostname_to_dest: bool,
    /// Zero is rejected when parsing; leave unset for no limit
    #[serde(default)]
    pub max_concurrent_units: Option<NonZeroUsize>,
    #[serde(default)]
    pub folders: Vec<FolderSection>,
    #[serde(default)]
    pub global_excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSection {
    #[serde(default, alias = "src")]
    pub src_path: String,
    #[serde(default, alias = "dest")]
    pub dest_prefix: String,
    #[serde(default)]
    pub gzip: bool,
    #[serde(default)]
    pub s3_storage_class: String,
}

impl BackupConfig {
    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: BackupConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bucket()?;

        if self.backup.folders.is_empty() {
            return Err(ConfigError::NoFolders);
        }

        for (index, folder) in self.backup.folders.iter().enumerate() {
            if folder.src_path.trim().is_empty() {
                return Err(ConfigError::BlankSource { index });
            }
            if folder.dest_prefix.trim().is_empty() {
                return Err(ConfigError::BlankDestination { index });
            }
            KeyPrefix::new(&folder.dest_prefix)
                .map_err(|reason| ConfigError::InvalidDestination { index, reason })?;
        }

        self.exclusion_matcher()?;
        self.configured_prefix()?;
        Ok(())
    }

    pub fn bucket(&self) -> Result<BucketName, ConfigError> {
        BucketName::new(self.aws.s3_bucket_name.clone()).map_err(ConfigError::InvalidBucket)
    }

    /// Storage class used when a folder sets none
    pub fn default_storage_class(&self) -> Option<String> {
        self.backup
            .default_s3_storage_class
            .as_ref()
            .or(self.aws.default_s3_storage_class.as_ref())
            .map(|class| class.trim().to_string())
            .filter(|class| !class.is_empty())
    }

    pub fn declarations(&self) -> Vec<BackupFolderDeclaration> {
        self.backup
            .folders
            .iter()
            .map(|folder| {
                BackupFolderDeclaration::new(folder.src_path.trim(), folder.dest_prefix.clone())
                    .with_gzip(folder.gzip)
                    .with_storage_class(folder.s3_storage_class.clone())
            })
            .collect()
    }

    pub fn exclusion_matcher(&self) -> Result<ExclusionMatcher, ConfigError> {
        for pattern in &self.backup.global_excludes {
            crate::services::exclusion::validate_pattern(pattern).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
        }

        ExclusionMatcher::from_patterns(&self.backup.global_excludes).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: source.glob().unwrap_or_default().to_string(),
                source,
            }
        })
    }

    /// Prefix prepended to every destination: the lowercased hostname when
    /// enabled, followed by `defaultPrefixToPrepend`
    pub fn global_prefix(&self, hostname: Option<&str>) -> Result<KeyPrefix, ConfigError> {
        let host = if self.backup.prepend_hostname_to_dest {
            let host = hostname.map(|h| h.trim().to_lowercase()).unwrap_or_default();
            KeyPrefix::new(&host).map_err(|reason| ConfigError::InvalidPrefix {
                prefix: host.clone(),
                reason,
            })?
        } else {
            KeyPrefix::root()
        };

        Ok(host.join(&self.configured_prefix()?))
    }

    /// [`Self::global_prefix`] for the machine we are running on
    pub fn resolve_global_prefix(&self) -> Result<KeyPrefix, ConfigError> {
        let hostname = gethostname::gethostname();
        self.global_prefix(hostname.to_str())
    }

    fn configured_prefix(&self) -> Result<KeyPrefix, ConfigError> {
        let raw = &self.backup.default_prefix_to_prepend;
        KeyPrefix::new(raw).map_err(|reason| ConfigError::InvalidPrefix {
            prefix: raw.clone(),
            reason,
        })
    }
}

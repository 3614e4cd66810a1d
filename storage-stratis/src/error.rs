// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use storage_sys::SysError;
use thiserror::Error;

/// Failure of the Stratis stage, tagged with what was being done and to which resource.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("waiting on {purpose} devices failed: {source}")]
    Resolution {
        purpose: String,
        #[source]
        source: SysError,
    },

    #[error("creating Stratis pool {pool:?} failed: {source}")]
    PoolCreation {
        pool: String,
        #[source]
        source: SysError,
    },

    #[error("creating Stratis filesystem {filesystem:?} failed: {source}")]
    FilesystemCreation {
        filesystem: String,
        #[source]
        source: SysError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionErrorKind {
    Resolution,
    PoolCreation,
    FilesystemCreation,
}

impl fmt::Display for ProvisionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolution => "device resolution",
            Self::PoolCreation => "pool creation",
            Self::FilesystemCreation => "filesystem creation",
        })
    }
}

impl ProvisionError {
    pub fn kind(&self) -> ProvisionErrorKind {
        match self {
            Self::Resolution { .. } => ProvisionErrorKind::Resolution,
            Self::PoolCreation { .. } => ProvisionErrorKind::PoolCreation,
            Self::FilesystemCreation { .. } => ProvisionErrorKind::FilesystemCreation,
        }
    }

    /// Name of the pool or filesystem that failed, if a creation failed.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::Resolution { .. } => None,
            Self::PoolCreation { pool, .. } => Some(pool.as_str()),
            Self::FilesystemCreation { filesystem, .. } => Some(filesystem.as_str()),
        }
    }

    /// The underlying system failure.
    pub fn sys_error(&self) -> &SysError {
        match self {
            Self::Resolution { source, .. }
            | Self::PoolCreation { source, .. }
            | Self::FilesystemCreation { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> SysError {
        SysError::CommandFailed {
            command: "stratis pool create p1 /dev/sda".to_string(),
            status: Some(1),
            stderr: "device busy".to_string(),
        }
    }

    #[test]
    fn pool_error_names_pool_and_cause() {
        let error = ProvisionError::PoolCreation {
            pool: "p1".to_string(),
            source: failed(),
        };

        assert_eq!(error.kind(), ProvisionErrorKind::PoolCreation);
        assert_eq!(error.resource(), Some("p1"));
        let message = error.to_string();
        assert!(message.contains("pool \"p1\""));
        assert!(message.contains("device busy"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn resolution_error_has_no_resource() {
        let error = ProvisionError::Resolution {
            purpose: "stratis".to_string(),
            source: SysError::DeviceTimeout {
                device: "/dev/sdz".to_string(),
                timeout: std::time::Duration::from_secs(1),
            },
        };

        assert_eq!(error.kind(), ProvisionErrorKind::Resolution);
        assert_eq!(error.resource(), None);
        assert!(matches!(error.sys_error(), SysError::DeviceTimeout { .. }));
        assert_eq!(error.kind().to_string(), "device resolution");
    }
}

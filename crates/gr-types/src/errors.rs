use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the GridRun harness
#[derive(Error, Debug)]
pub enum GrError {
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reading or writing the remaining/completed queue files
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Work queue file not found: {}", .path.display())]
    MissingQueue { path: PathBuf },

    #[error("Work item must contain at least one non-blank character")]
    EmptyItem,

    #[error("Queue file {} could not be accessed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors splitting the combination space into groups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("Number of groups must be at least 1")]
    ZeroGroups,

    #[error("{total} combinations cannot be split evenly into {groups} groups")]
    Uneven { total: usize, groups: usize },

    #[error("Group {group} does not exist, valid groups are 0..{groups}")]
    GroupOutOfRange { group: usize, groups: usize },
}

/// Errors talking to the external optimizer process
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to start worker `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker I/O failed: {0}")]
    Io(String),
}

/// Errors that stop a drain session
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Drain interrupted with {remaining} items still queued")]
    Interrupted { remaining: usize },

    #[error("Failed to write result file {}: {source}", .path.display())]
    ResultWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for GridRun operations
pub type GrResult<T> = Result<T, GrError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::GrError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PartitionError::Uneven { total: 10, groups: 3 };

        assert!(error.to_string().contains("10 combinations"));
        assert!(error.to_string().contains("3 groups"));

        let missing = QueueError::MissingQueue {
            path: PathBuf::from("remaining.txt"),
        };
        assert_eq!(missing.to_string(), "Work queue file not found: remaining.txt");
    }

    #[test]
    fn test_error_conversion() {
        let partition_error = PartitionError::ZeroGroups;
        let gr_error: GrError = partition_error.into();

        match gr_error {
            GrError::Partition(PartitionError::ZeroGroups) => (),
            _ => panic!("Expected Partition error"),
        }

        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let gr_error: GrError = io_error.into();
        assert!(matches!(gr_error, GrError::Io(_)));
    }

    #[test]
    fn test_config_macro() {
        let err = config_error!("Unknown field: {}", "workers");
        assert_eq!(err.to_string(), "Configuration error: Unknown field: workers");
    }
}

//==============================================================================
// Tour errors
//==============================================================================

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourError {
    #[error("Mapped region '{name}' already exists")]
    RegionExists { name: String },

    #[error("Access of {len} bytes at offset {offset} is outside the {size}-byte region")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    #[error("Worker thread {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TourError {
    pub fn region_exists(name: impl Into<String>) -> Self {
        Self::RegionExists { name: name.into() }
    }

    pub fn out_of_bounds(offset: usize, len: usize, size: usize) -> Self {
        Self::OutOfBounds { offset, len, size }
    }
}

pub type Result<T> = std::result::Result<T, TourError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = TourError::region_exists("RaceResults");
        assert_eq!(err.to_string(), "Mapped region 'RaceResults' already exists");

        let err = TourError::out_of_bounds(1022, 4, 1024);
        assert_eq!(
            err.to_string(),
            "Access of 4 bytes at offset 1022 is outside the 1024-byte region"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(TourError::Io(_))));
    }
}

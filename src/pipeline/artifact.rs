//! Artifact checks shared by the stage tasks

use crate::EtlError;
use std::path::Path;

/// Verifies that a stage artifact exists and is not empty
///
/// # Returns
///
/// * `Ok(u64)` - The artifact's size in bytes
/// * `Err(EtlError::MissingArtifact)` - Nothing exists at `path`
/// * `Err(EtlError::EmptyArtifact)` - The file is zero bytes long
pub fn check_file_content(path: &Path) -> Result<u64, EtlError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EtlError::MissingArtifact {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.len() == 0 {
        return Err(EtlError::EmptyArtifact {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("{} holds {} bytes", path.display(), metadata.len());
    Ok(metadata.len())
}

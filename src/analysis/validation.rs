use super::{AnalysisFailure, ErrorCode, PatientMetadata};
use crate::fingerprint::FileSource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub allowed_mime_types: Vec<String>,
    pub max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}

/// Checks everything that can be checked before any I/O.
pub fn validate_request<'a>(
    policy: &UploadPolicy,
    file: Option<&'a dyn FileSource>,
    patient: &PatientMetadata,
) -> Result<&'a dyn FileSource, AnalysisFailure> {
    let file = file.ok_or_else(|| AnalysisFailure::new(ErrorCode::NoFile))?;

    if patient.complete().is_none() {
        return Err(AnalysisFailure::new(ErrorCode::MissingMetadata));
    }
    if !policy.allows(file.mime_type()) {
        return Err(AnalysisFailure::new(ErrorCode::InvalidFileType));
    }
    if file.size() > policy.max_file_size {
        return Err(AnalysisFailure::new(ErrorCode::FileTooLarge));
    }
    if file.size() == 0 {
        return Err(AnalysisFailure::new(ErrorCode::EmptyFile));
    }

    Ok(file)
}

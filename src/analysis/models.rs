use crate::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Patient fields the prediction endpoint requires alongside the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientMetadata {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub lesion_location: Option<String>,
}

impl PatientMetadata {
    pub fn new(age: u32, sex: &str, lesion_location: &str) -> Self {
        Self {
            age: Some(age),
            sex: Some(sex.to_string()),
            lesion_location: Some(lesion_location.to_string()),
        }
    }

    /// `(age, sex, location)` when every field is present and non-blank.
    pub fn complete(&self) -> Option<(u32, &str, &str)> {
        let sex = self.sex.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let location = self
            .lesion_location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((self.age?, sex, location))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const HIGH_THRESHOLD: f64 = 0.7;
    pub const MEDIUM_THRESHOLD: f64 = 0.4;

    pub fn from_probability(probability: f64) -> Self {
        if probability > Self::HIGH_THRESHOLD {
            RiskTier::High
        } else if probability > Self::MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: String,
    pub probability: f64,
}

/// Normalized classification result, as cached and shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ranked predictions, highest first, class codes lower-cased.
    pub predictions: Vec<Prediction>,
    pub most_likely: Prediction,
    pub probabilities: BTreeMap<String, f64>,
    pub risk: RiskTier,
}

impl AnalysisResult {
    pub fn top_class(&self) -> &str {
        &self.most_likely.class
    }

    pub fn top_probability(&self) -> f64 {
        self.most_likely.probability
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Connectivity,
    Timeout,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoFile,
    MissingMetadata,
    InvalidFileType,
    #[serde(rename = "FILE_SIZE_EXCEEDED")]
    FileTooLarge,
    EmptyFile,
    FileUnreadable,
    ConnectionFailed,
    #[serde(rename = "NETWORK_UNAVAILABLE")]
    NetworkError,
    Timeout,
    #[serde(rename = "AI_PROCESSING_ERROR")]
    ProcessingFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoFile => "NO_FILE",
            ErrorCode::MissingMetadata => "MISSING_METADATA",
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::FileTooLarge => "FILE_SIZE_EXCEEDED",
            ErrorCode::EmptyFile => "EMPTY_FILE",
            ErrorCode::FileUnreadable => "FILE_UNREADABLE",
            ErrorCode::ConnectionFailed => "CONNECTION_FAILED",
            ErrorCode::NetworkError => "NETWORK_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ProcessingFailed => "AI_PROCESSING_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::NoFile
            | ErrorCode::MissingMetadata
            | ErrorCode::InvalidFileType
            | ErrorCode::FileTooLarge
            | ErrorCode::EmptyFile
            | ErrorCode::FileUnreadable => ErrorKind::Validation,
            ErrorCode::ConnectionFailed | ErrorCode::NetworkError => ErrorKind::Connectivity,
            ErrorCode::Timeout => ErrorKind::Timeout,
            ErrorCode::ProcessingFailed => ErrorKind::Server,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::NoFile => "No se ha seleccionado ningún archivo",
            ErrorCode::MissingMetadata => {
                "Se requieren los datos del paciente: edad, sexo y ubicación de la lesión"
            }
            ErrorCode::InvalidFileType => "Tipo de archivo no válido. Solo se permiten JPG y PNG",
            ErrorCode::FileTooLarge => "El archivo es demasiado grande. Máximo 10MB",
            ErrorCode::EmptyFile => "El archivo está vacío",
            ErrorCode::FileUnreadable => "No se pudo leer el archivo seleccionado",
            ErrorCode::ConnectionFailed => {
                "No se pudo conectar con el servidor. Verifica que el backend esté corriendo"
            }
            ErrorCode::NetworkError => "Error de conexión. Verifica tu conexión a internet",
            ErrorCode::Timeout => {
                "El servidor tardó demasiado en responder. Por favor, inténtalo de nuevo"
            }
            ErrorCode::ProcessingFailed => {
                "Error al procesar la imagen. Por favor, inténtalo de nuevo"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub from_cache: bool,
    pub fingerprint: Option<Fingerprint>,
    pub message: String,
}

/// What a call to `AnalysisClient::analyze` resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(AnalysisReport),
    Failed(AnalysisFailure),
    /// Superseded by a newer call on the same client.
    Cancelled,
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(_))
    }

    pub fn from_cache(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(r) if r.from_cache)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(report) => Some(&report.result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match self {
            AnalysisOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// `{ success, result?, fromCache, message?, error? }`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AnalysisOutcome::Completed(report) => serde_json::json!({
                "success": true,
                "result": report.result,
                "fromCache": report.from_cache,
                "fingerprint": report.fingerprint,
                "message": report.message,
            }),
            AnalysisOutcome::Failed(failure) => serde_json::json!({
                "success": false,
                "fromCache": false,
                "error": failure.code,
                "message": failure.message,
            }),
            AnalysisOutcome::Cancelled => serde_json::json!({
                "success": false,
                "fromCache": false,
                "cancelled": true,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
    pub detail: Option<String>,
}

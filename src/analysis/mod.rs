mod catalog;
mod client;
mod models;
mod normalize;
mod validation;

pub use catalog::{lesion_info, LesionInfo, Malignancy, Urgency, LESION_CATALOG};
pub use client::{AnalysisClient, AnalysisSettings, HEALTH_CACHE_KEY};
pub use models::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, AnalysisResult, ErrorCode, ErrorKind,
    HealthStatus, PatientMetadata, Prediction, RiskTier,
};
pub use normalize::{normalize, MODEL_CLASSES};
pub use validation::{validate_request, UploadPolicy};

use super::{
    normalize, validate_request, AnalysisFailure, AnalysisOutcome, AnalysisReport,
    AnalysisResult, ErrorCode, HealthStatus, PatientMetadata, UploadPolicy,
};
use crate::cache::ResultCache;
use crate::fingerprint::{FileSource, FingerprintGenerator};
use crate::http::{PredictUpload, PredictionTransport, TransportError};
use crate::logger::LOGGER;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

pub const HEALTH_CACHE_KEY: &str = "health";
const ANALYSIS_KEY_PREFIX: &str = "analysis:";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub request_timeout: Duration,
    pub health_timeout: Duration,
    pub result_ttl_ms: u64,
    pub health_ttl_ms: u64,
    pub policy: UploadPolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            result_ttl_ms: 30 * 60 * 1000,
            health_ttl_ms: 30 * 1000,
            policy: UploadPolicy::default(),
        }
    }
}

/// Fingerprints, caches and uploads images for classification.
///
/// At most one prediction request is in flight per client: starting a new
/// analysis cancels the request of the previous one, which then resolves to
/// `AnalysisOutcome::Cancelled`.
pub struct AnalysisClient<T> {
    transport: T,
    fingerprints: FingerprintGenerator,
    results: Arc<ResultCache<AnalysisResult>>,
    health: ResultCache<HealthStatus>,
    settings: AnalysisSettings,
    flight_seq: AtomicU64,
    in_flight: Mutex<Option<(u64, oneshot::Sender<()>)>>,
}

impl<T: PredictionTransport> AnalysisClient<T> {
    pub fn new(
        transport: T,
        fingerprints: FingerprintGenerator,
        results: Arc<ResultCache<AnalysisResult>>,
        settings: AnalysisSettings,
    ) -> Self {
        let health = ResultCache::new(results.clock());
        Self {
            transport,
            fingerprints,
            results,
            health,
            settings,
            flight_seq: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn fingerprints(&self) -> &FingerprintGenerator {
        &self.fingerprints
    }

    pub async fn analyze(
        &self,
        file: Option<&dyn FileSource>,
        patient: &PatientMetadata,
    ) -> AnalysisOutcome {
        let request_id = Uuid::new_v4();
        let file = match validate_request(&self.settings.policy, file, patient) {
            Ok(file) => file,
            Err(failure) => {
                LOGGER.warning(&format!("[{}] Rejected upload: {}", request_id, failure));
                return AnalysisOutcome::Failed(failure);
            }
        };
        // validate_request guarantees every field is present
        let Some((age, sex, location)) = patient.complete() else {
            return AnalysisOutcome::Failed(AnalysisFailure::new(ErrorCode::MissingMetadata));
        };

        LOGGER.analysis(&format!(
            "[{}] Analyzing {} ({} bytes)",
            request_id,
            file.name(),
            file.size()
        ));

        let fingerprint = match self.fingerprints.generate(file).await {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                LOGGER.warning(&format!(
                    "[{}] Fingerprint unavailable, caching disabled: {}",
                    request_id, e
                ));
                None
            }
        };
        let cache_key = fingerprint
            .as_ref()
            .map(|fp| format!("{}{}", ANALYSIS_KEY_PREFIX, fp.token));

        if let Some(key) = &cache_key {
            if let Some(result) = self.results.get(key) {
                LOGGER.analysis(&format!("[{}] Using cached result", request_id));
                return AnalysisOutcome::Completed(AnalysisReport {
                    result,
                    from_cache: true,
                    fingerprint,
                    message: "Análisis completado exitosamente".to_string(),
                });
            }
        }

        let contents = match file.read_all().await {
            Ok(contents) => contents,
            Err(e) => {
                LOGGER.error(&format!("[{}] Could not read {}: {}", request_id, file.name(), e));
                return AnalysisOutcome::Failed(AnalysisFailure::new(ErrorCode::FileUnreadable));
            }
        };
        let upload = PredictUpload {
            file_name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            contents,
            age,
            sex: sex.to_string(),
            anatom_site_general: location.to_string(),
        };

        let (flight_id, cancelled) = self.begin_flight();
        let request = tokio::time::timeout(
            self.settings.request_timeout,
            self.transport.predict(upload),
        );
        let response = tokio::select! {
            _ = cancelled => {
                LOGGER.analysis(&format!("[{}] Cancelled by a newer analysis", request_id));
                return AnalysisOutcome::Cancelled;
            }
            response = request => response,
        };
        self.end_flight(flight_id);

        let response = match response {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                LOGGER.error(&format!("[{}] Prediction failed: {}", request_id, e));
                return AnalysisOutcome::Failed(failure_from_transport(e));
            }
            Err(_) => {
                LOGGER.error(&format!(
                    "[{}] Prediction timed out after {:?}",
                    request_id, self.settings.request_timeout
                ));
                return AnalysisOutcome::Failed(AnalysisFailure::new(ErrorCode::Timeout));
            }
        };

        let result = match normalize(response) {
            Ok(result) => result,
            Err(failure) => {
                LOGGER.error(&format!("[{}] Unusable prediction: {}", request_id, failure));
                return AnalysisOutcome::Failed(failure);
            }
        };

        if let Some(key) = cache_key {
            self.results
                .set(key, result.clone(), self.settings.result_ttl_ms);
        }
        LOGGER.analysis(&format!(
            "[{}] Result: {} ({:.2}, risk {})",
            request_id,
            result.top_class(),
            result.top_probability(),
            result.risk
        ));

        AnalysisOutcome::Completed(AnalysisReport {
            result,
            from_cache: false,
            fingerprint,
            message: "Análisis completado exitosamente".to_string(),
        })
    }

    /// Registers a new in-flight request and cancels the previous one.
    fn begin_flight(&self) -> (u64, oneshot::Receiver<()>) {
        let id = self.flight_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = oneshot::channel();
        let previous = match self.in_flight.lock() {
            Ok(mut slot) => slot.replace((id, tx)),
            Err(poisoned) => poisoned.into_inner().replace((id, tx)),
        };
        if let Some((_, previous)) = previous {
            let _ = previous.send(());
        }
        (id, rx)
    }

    fn end_flight(&self, id: u64) {
        let mut slot = match self.in_flight.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.as_ref().map_or(false, |(current, _)| *current == id) {
            slot.take();
        }
    }

    /// Probes `GET /health`; the answer is reused for `health_ttl_ms`.
    pub async fn check_health(&self) -> HealthStatus {
        if let Some(status) = self.health.get(HEALTH_CACHE_KEY) {
            return status;
        }

        let probe = tokio::time::timeout(self.settings.health_timeout, self.transport.health());
        let status = match probe.await {
            Ok(Ok(response)) => HealthStatus {
                healthy: true,
                message: "Servicio disponible".to_string(),
                detail: response.status,
            },
            Ok(Err(e)) => {
                LOGGER.warning(&format!("Prediction service unavailable: {}", e));
                HealthStatus {
                    healthy: false,
                    message: "Servicio no disponible".to_string(),
                    detail: Some(e.to_string()),
                }
            }
            Err(_) => HealthStatus {
                healthy: false,
                message: "Servicio offline".to_string(),
                detail: Some(TransportError::Timeout.to_string()),
            },
        };

        self.health
            .set(HEALTH_CACHE_KEY, status.clone(), self.settings.health_ttl_ms);
        status
    }

    pub fn clear_cache(&self) {
        self.results.clear();
        self.health.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.results.size()
    }
}

fn failure_from_transport(error: TransportError) -> AnalysisFailure {
    match error {
        TransportError::Connect(_) => AnalysisFailure::new(ErrorCode::ConnectionFailed),
        TransportError::Network(_) => AnalysisFailure::new(ErrorCode::NetworkError),
        TransportError::Timeout => AnalysisFailure::new(ErrorCode::Timeout),
        TransportError::Status {
            message: Some(message),
            ..
        } => AnalysisFailure::with_message(ErrorCode::ProcessingFailed, message),
        TransportError::Status { .. } | TransportError::Malformed(_) => {
            AnalysisFailure::new(ErrorCode::ProcessingFailed)
        }
    }
}

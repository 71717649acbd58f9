use super::{
    ContentDigest, ContentFingerprint, FileSource, FingerprintStrategy, MetadataFingerprint,
    SampledFingerprint, Sha256Digest,
};
use crate::cache::{Clock, SystemClock};
use crate::logger::LOGGER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FingerprintMethod {
    Content,
    Sampled,
    MetadataOnly,
}

impl fmt::Display for FingerprintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FingerprintMethod::Content => "content",
            FingerprintMethod::Sampled => "sampled",
            FingerprintMethod::MetadataOnly => "metadata-only",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub token: String,
    pub method: FingerprintMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    DigestUnavailable,
    Digest(String),
    Io(String),
    EmptyToken,
    Exhausted,
}

impl fmt::Display for FingerprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintError::DigestUnavailable => write!(f, "digest capability unavailable"),
            FingerprintError::Digest(e) => write!(f, "digest failed: {}", e),
            FingerprintError::Io(e) => write!(f, "read failed: {}", e),
            FingerprintError::EmptyToken => write!(f, "strategy produced an empty token"),
            FingerprintError::Exhausted => write!(f, "every fingerprint method failed"),
        }
    }
}

impl std::error::Error for FingerprintError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub digest_available: bool,
    pub methods: Vec<FingerprintMethod>,
    pub recommended: Option<FingerprintMethod>,
}

/// Tries each strategy in order; the first one that yields a token wins.
pub struct FingerprintGenerator {
    strategies: Vec<Box<dyn FingerprintStrategy>>,
}

impl FingerprintGenerator {
    pub fn new(strategies: Vec<Box<dyn FingerprintStrategy>>) -> Self {
        Self { strategies }
    }

    /// content → sampled → metadata-only.
    pub fn standard(digest: Option<Arc<dyn ContentDigest>>, clock: Arc<dyn Clock>) -> Self {
        Self::new(vec![
            Box::new(ContentFingerprint::new(digest)),
            Box::new(SampledFingerprint),
            Box::new(MetadataFingerprint::new(clock)),
        ])
    }

    pub fn methods(&self) -> Vec<FingerprintMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            digest_available: self
                .strategies
                .iter()
                .any(|s| s.method() == FingerprintMethod::Content && s.is_available()),
            methods: self.methods(),
            recommended: self
                .strategies
                .iter()
                .find(|s| s.is_available())
                .map(|s| s.method()),
        }
    }

    pub async fn generate(&self, file: &dyn FileSource) -> Result<Fingerprint, FingerprintError> {
        LOGGER.fingerprint(&format!(
            "Fingerprinting {} ({} bytes)",
            file.name(),
            file.size()
        ));

        for strategy in &self.strategies {
            let method = strategy.method();
            if !strategy.is_available() {
                LOGGER.fingerprint(&format!("Method {} unavailable, skipping", method));
                continue;
            }

            match strategy.fingerprint(file).await {
                Ok(token) if !token.is_empty() => {
                    LOGGER.fingerprint(&format!("Method used: {}", method));
                    return Ok(Fingerprint { token, method });
                }
                Ok(_) => {
                    LOGGER.fingerprint(&format!(
                        "Method {} failed: {}",
                        method,
                        FingerprintError::EmptyToken
                    ));
                }
                Err(e) => {
                    LOGGER.fingerprint(&format!("Method {} failed: {}", method, e));
                }
            }
        }

        LOGGER.warning(&format!("Could not fingerprint {}", file.name()));
        Err(FingerprintError::Exhausted)
    }
}

impl Default for FingerprintGenerator {
    fn default() -> Self {
        Self::standard(Some(Arc::new(Sha256Digest)), Arc::new(SystemClock))
    }
}

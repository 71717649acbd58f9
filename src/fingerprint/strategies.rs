use super::{djb2_hex, ContentDigest, FileSource, FingerprintError, FingerprintMethod};
use crate::cache::Clock;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;

/// Bytes sampled from each end of the file by the sampled method.
pub const SAMPLE_SIZE: u64 = 1024;

/// One way of turning a file into a fingerprint token.
pub trait FingerprintStrategy: Send + Sync {
    fn method(&self) -> FingerprintMethod;

    /// Whether the capability this strategy needs is present at all.
    fn is_available(&self) -> bool {
        true
    }

    fn fingerprint<'a>(
        &'a self,
        file: &'a dyn FileSource,
    ) -> BoxFuture<'a, Result<String, FingerprintError>>;
}

fn describe(file: &dyn FileSource) -> String {
    format!(
        "{}-{}-{}-{}",
        file.name(),
        file.size(),
        file.mime_type(),
        file.last_modified_ms()
    )
}

/// Digest of the full file contents, lowercase hex.
pub struct ContentFingerprint {
    digest: Option<Arc<dyn ContentDigest>>,
}

impl ContentFingerprint {
    pub fn new(digest: Option<Arc<dyn ContentDigest>>) -> Self {
        Self { digest }
    }
}

impl FingerprintStrategy for ContentFingerprint {
    fn method(&self) -> FingerprintMethod {
        FingerprintMethod::Content
    }

    fn is_available(&self) -> bool {
        self.digest.is_some()
    }

    fn fingerprint<'a>(
        &'a self,
        file: &'a dyn FileSource,
    ) -> BoxFuture<'a, Result<String, FingerprintError>> {
        async move {
            let digest = self
                .digest
                .as_ref()
                .ok_or(FingerprintError::DigestUnavailable)?;
            let bytes = file
                .read_all()
                .await
                .map_err(|e| FingerprintError::Io(e.to_string()))?;
            let hash = digest.digest(&bytes)?;
            Ok(hex::encode(hash))
        }
        .boxed()
    }
}

/// djb2 over file metadata plus the first and last kilobyte of content.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampledFingerprint;

impl FingerprintStrategy for SampledFingerprint {
    fn method(&self) -> FingerprintMethod {
        FingerprintMethod::Sampled
    }

    fn fingerprint<'a>(
        &'a self,
        file: &'a dyn FileSource,
    ) -> BoxFuture<'a, Result<String, FingerprintError>> {
        async move {
            let size = file.size();
            let sample = SAMPLE_SIZE.min(size);
            let head = file
                .read_range(0, sample)
                .await
                .map_err(|e| FingerprintError::Io(e.to_string()))?;
            let tail = file
                .read_range(size - sample, size)
                .await
                .map_err(|e| FingerprintError::Io(e.to_string()))?;

            let mut composite = describe(file);
            composite.push_str(&String::from_utf8_lossy(&head));
            composite.push_str(&String::from_utf8_lossy(&tail));
            Ok(djb2_hex(&composite))
        }
        .boxed()
    }
}

/// djb2 over file metadata and the current time.
///
/// Never stable across calls: a file that reaches this method always misses
/// the result cache.
pub struct MetadataFingerprint {
    clock: Arc<dyn Clock>,
}

impl MetadataFingerprint {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl FingerprintStrategy for MetadataFingerprint {
    fn method(&self) -> FingerprintMethod {
        FingerprintMethod::MetadataOnly
    }

    fn fingerprint<'a>(
        &'a self,
        file: &'a dyn FileSource,
    ) -> BoxFuture<'a, Result<String, FingerprintError>> {
        let composite = format!("{}-{}", describe(file), self.clock.now_ms());
        async move { Ok(djb2_hex(&composite)) }.boxed()
    }
}

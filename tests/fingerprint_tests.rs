#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use oncoderma::cache::ManualClock;
    use oncoderma::fingerprint::{
        djb2_hex, ContentDigest, FileSource, FingerprintError, FingerprintGenerator,
        FingerprintMethod, FingerprintStrategy, MemoryFile, Sha256Digest,
    };
    use std::io;
    use std::sync::Arc;

    struct BrokenDigest;

    impl ContentDigest for BrokenDigest {
        fn digest(&self, _bytes: &[u8]) -> Result<Vec<u8>, FingerprintError> {
            Err(FingerprintError::Digest("engine offline".to_string()))
        }
    }

    /// Metadata is readable but every byte read fails.
    struct UnreadableFile;

    impl FileSource for UnreadableFile {
        fn name(&self) -> &str {
            "locked.png"
        }
        fn size(&self) -> u64 {
            2048
        }
        fn mime_type(&self) -> &str {
            "image/png"
        }
        fn last_modified_ms(&self) -> i64 {
            1_700_000_000_000
        }
        fn read_all(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")) }.boxed()
        }
        fn read_range(&self, _start: u64, _end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")) }.boxed()
        }
    }

    struct FailingStrategy;

    impl FingerprintStrategy for FailingStrategy {
        fn method(&self) -> FingerprintMethod {
            FingerprintMethod::Content
        }
        fn fingerprint<'a>(
            &'a self,
            _file: &'a dyn FileSource,
        ) -> BoxFuture<'a, Result<String, FingerprintError>> {
            async { Err(FingerprintError::Io("boom".to_string())) }.boxed()
        }
    }

    struct EmptyStrategy;

    impl FingerprintStrategy for EmptyStrategy {
        fn method(&self) -> FingerprintMethod {
            FingerprintMethod::Sampled
        }
        fn fingerprint<'a>(
            &'a self,
            _file: &'a dyn FileSource,
        ) -> BoxFuture<'a, Result<String, FingerprintError>> {
            async { Ok(String::new()) }.boxed()
        }
    }

    fn image() -> MemoryFile {
        MemoryFile::new("lesion.jpg", "image/jpeg", vec![7u8; 5000]).with_last_modified(99)
    }

    fn generator(digest: Option<Arc<dyn ContentDigest>>) -> (FingerprintGenerator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        (FingerprintGenerator::standard(digest, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_content_method_is_preferred_and_stable() {
        let (generator, clock) = generator(Some(Arc::new(Sha256Digest)));
        let first = generator.generate(&image()).await.unwrap();
        clock.advance(10_000);
        let second = generator.generate(&image()).await.unwrap();

        assert_eq!(first.method, FingerprintMethod::Content);
        assert_eq!(first.token.len(), 64);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_digest_falls_back_to_sampled() {
        let (generator, _) = generator(None);
        let fingerprint = generator.generate(&image()).await.unwrap();
        assert_eq!(fingerprint.method, FingerprintMethod::Sampled);
        assert_eq!(fingerprint.token.len(), 16);
    }

    #[tokio::test]
    async fn test_failing_digest_falls_back_to_sampled() {
        let (generator, _) = generator(Some(Arc::new(BrokenDigest)));
        let fingerprint = generator.generate(&image()).await.unwrap();
        assert_eq!(fingerprint.method, FingerprintMethod::Sampled);
    }

    #[tokio::test]
    async fn test_unreadable_file_uses_metadata_only() {
        let (generator, clock) = generator(Some(Arc::new(Sha256Digest)));
        let first = generator.generate(&UnreadableFile).await.unwrap();
        clock.advance(1);
        let second = generator.generate(&UnreadableFile).await.unwrap();

        assert_eq!(first.method, FingerprintMethod::MetadataOnly);
        assert_eq!(
            first.token,
            djb2_hex("locked.png-2048-image/png-1700000000000-1000")
        );
        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn test_every_method_failing_is_exhaustion() {
        let generator = FingerprintGenerator::new(vec![Box::new(FailingStrategy)]);
        assert_eq!(
            generator.generate(&image()).await,
            Err(FingerprintError::Exhausted)
        );
    }

    #[tokio::test]
    async fn test_empty_token_is_not_accepted() {
        let generator = FingerprintGenerator::new(vec![Box::new(EmptyStrategy)]);
        assert_eq!(
            generator.generate(&image()).await,
            Err(FingerprintError::Exhausted)
        );
    }

    #[tokio::test]
    async fn test_empty_file_still_fingerprints() {
        let (generator, _) = generator(None);
        let empty = MemoryFile::new("empty.png", "image/png", Vec::<u8>::new());
        let fingerprint = generator.generate(&empty).await.unwrap();
        assert_eq!(fingerprint.method, FingerprintMethod::Sampled);
        assert_eq!(fingerprint.token, djb2_hex("empty.png-0-image/png-0"));
    }

    #[test]
    fn test_capabilities() {
        let (with_digest, _) = generator(Some(Arc::new(Sha256Digest)));
        let caps = with_digest.capabilities();
        assert!(caps.digest_available);
        assert_eq!(caps.recommended, Some(FingerprintMethod::Content));
        assert_eq!(
            caps.methods,
            vec![
                FingerprintMethod::Content,
                FingerprintMethod::Sampled,
                FingerprintMethod::MetadataOnly
            ]
        );

        let (without_digest, _) = generator(None);
        let caps = without_digest.capabilities();
        assert!(!caps.digest_available);
        assert_eq!(caps.recommended, Some(FingerprintMethod::Sampled));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(FingerprintMethod::MetadataOnly.to_string(), "metadata-only");
        assert_eq!(
            serde_json::to_string(&FingerprintMethod::MetadataOnly).unwrap(),
            "\"metadata-only\""
        );
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use oncoderma::analysis::{
        normalize, AnalysisClient, AnalysisOutcome, AnalysisResult, AnalysisSettings, ErrorCode,
        ErrorKind, PatientMetadata, RiskTier,
    };
    use oncoderma::cache::{ManualClock, ResultCache};
    use oncoderma::fingerprint::{
        FileSource, FingerprintError, FingerprintGenerator, FingerprintMethod,
        FingerprintStrategy, MemoryFile, Sha256Digest,
    };
    use oncoderma::http::{
        HealthResponse, PredictResponse, PredictUpload, PredictionTransport, RankedClass,
        TransportError,
    };
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone)]
    enum Behavior {
        Respond(PredictResponse),
        Fail(TransportError),
        Stall,
        StallFirstCall(PredictResponse),
    }

    struct MockTransport {
        behavior: Behavior,
        predict_calls: AtomicUsize,
        health_calls: AtomicUsize,
        healthy: bool,
        last_upload: Mutex<Option<PredictUpload>>,
    }

    impl MockTransport {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                predict_calls: AtomicUsize::new(0),
                health_calls: AtomicUsize::new(0),
                healthy: true,
                last_upload: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.predict_calls.load(Ordering::SeqCst)
        }
    }

    impl PredictionTransport for MockTransport {
        async fn predict(&self, upload: PredictUpload) -> Result<PredictResponse, TransportError> {
            let call = self.predict_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_upload.lock().unwrap() = Some(upload);
            match &self.behavior {
                Behavior::Respond(response) => Ok(response.clone()),
                Behavior::Fail(error) => Err(error.clone()),
                Behavior::Stall => std::future::pending().await,
                Behavior::StallFirstCall(response) => {
                    if call == 0 {
                        std::future::pending::<()>().await;
                    }
                    Ok(response.clone())
                }
            }
        }

        async fn health(&self) -> Result<HealthResponse, TransportError> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            if self.healthy {
                Ok(HealthResponse {
                    status: Some("ok".to_string()),
                })
            } else {
                Err(TransportError::Connect("refused".to_string()))
            }
        }
    }

    /// Bytes are readable in full but ranged reads fail.
    struct NoRangeFile(MemoryFile);

    impl FileSource for NoRangeFile {
        fn name(&self) -> &str {
            self.0.name()
        }
        fn size(&self) -> u64 {
            self.0.size()
        }
        fn mime_type(&self) -> &str {
            self.0.mime_type()
        }
        fn last_modified_ms(&self) -> i64 {
            self.0.last_modified_ms()
        }
        fn read_all(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            self.0.read_all()
        }
        fn read_range(&self, _start: u64, _end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            async { Err(io::Error::new(io::ErrorKind::Other, "no ranged reads")) }.boxed()
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
            async { Err(FingerprintError::DigestUnavailable) }.boxed()
        }
    }

    fn nv_response() -> PredictResponse {
        PredictResponse {
            top3: vec![
                RankedClass {
                    class: "NV".to_string(),
                    prob: 0.62,
                },
                RankedClass {
                    class: "BKL".to_string(),
                    prob: 0.25,
                },
                RankedClass {
                    class: "MEL".to_string(),
                    prob: 0.05,
                },
            ],
        }
    }

    fn patient() -> PatientMetadata {
        PatientMetadata::new(45, "FEMALE", "posterior torso")
    }

    fn jpeg(len: usize) -> MemoryFile {
        let mut contents = vec![0u8; len];
        for (i, byte) in contents.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }
        MemoryFile::new("lesion.jpg", "image/jpeg", contents).with_last_modified(1_700_000_000_000)
    }

    struct Harness {
        client: AnalysisClient<MockTransport>,
        cache: Arc<ResultCache<AnalysisResult>>,
        clock: Arc<ManualClock>,
    }

    fn harness_with(
        behavior: Behavior,
        make_generator: impl FnOnce(Arc<ManualClock>) -> FingerprintGenerator,
        settings: AnalysisSettings,
    ) -> Harness {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = Arc::new(ResultCache::new(clock.clone()));
        let generator = make_generator(clock.clone());
        let client = AnalysisClient::new(
            MockTransport::new(behavior),
            generator,
            cache.clone(),
            settings,
        );
        Harness {
            client,
            cache,
            clock,
        }
    }

    fn standard_generator(clock: Arc<ManualClock>) -> FingerprintGenerator {
        FingerprintGenerator::standard(Some(Arc::new(Sha256Digest)), clock)
    }

    fn harness(behavior: Behavior) -> Harness {
        harness_with(behavior, standard_generator, AnalysisSettings::default())
    }

    #[tokio::test]
    async fn test_second_identical_upload_is_served_from_cache() {
        let h = harness(Behavior::Respond(nv_response()));

        let first = h.client.analyze(Some(&jpeg(4096)), &patient()).await;
        let second = h.client.analyze(Some(&jpeg(4096)), &patient()).await;

        assert!(first.is_success());
        assert!(!first.from_cache());
        assert!(second.from_cache());
        assert_eq!(first.result(), second.result());
        assert_eq!(h.client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_result_expires_after_thirty_minutes() {
        let h = harness(Behavior::Respond(nv_response()));

        h.client.analyze(Some(&jpeg(100)), &patient()).await;
        h.clock.advance(30 * 60 * 1000);
        let again = h.client.analyze(Some(&jpeg(100)), &patient()).await;

        assert!(!again.from_cache());
        assert_eq!(h.client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_two_megabyte_jpeg_scenario() {
        let h = harness(Behavior::Respond(nv_response()));
        let file = jpeg(2 * 1024 * 1024);

        let outcome = h.client.analyze(Some(&file), &patient()).await;
        let AnalysisOutcome::Completed(report) = outcome else {
            panic!("expected a completed analysis, got {:?}", outcome);
        };

        assert_eq!(report.result.top_class(), "nv");
        assert_eq!(report.result.risk, RiskTier::Medium);
        assert_eq!(report.result.probabilities["bcc"], 0.0);
        assert!(!report.from_cache);

        let fingerprint = report.fingerprint.expect("fingerprint");
        assert_eq!(fingerprint.method, FingerprintMethod::Content);
        assert_eq!(h.cache.size(), 1);
        assert!(h.cache.has(&format!("analysis:{}", fingerprint.token)));

        let upload = h.client.transport().last_upload.lock().unwrap().clone().unwrap();
        assert_eq!(upload.age, 45);
        assert_eq!(upload.sex, "FEMALE");
        assert_eq!(upload.anatom_site_general, "posterior torso");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.contents.len(), 2 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_unsupported_type_makes_no_network_call() {
        let h = harness(Behavior::Respond(nv_response()));
        let gif = MemoryFile::new("lesion.gif", "image/gif", vec![1u8; 64]);

        let outcome = h.client.analyze(Some(&gif), &patient()).await;

        let failure = outcome.failure().expect("failure");
        assert_eq!(failure.code, ErrorCode::InvalidFileType);
        assert_eq!(failure.kind(), ErrorKind::Validation);
        assert_eq!(h.client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_and_oversize_files_fail_differently() {
        let h = harness(Behavior::Respond(nv_response()));
        let empty = MemoryFile::new("lesion.png", "image/png", Vec::<u8>::new());
        let huge = MemoryFile::new("lesion.png", "image/png", vec![0u8; 10 * 1024 * 1024 + 1]);

        let empty = h.client.analyze(Some(&empty), &patient()).await;
        let huge = h.client.analyze(Some(&huge), &patient()).await;

        assert_eq!(empty.failure().map(|f| f.code), Some(ErrorCode::EmptyFile));
        assert_eq!(huge.failure().map(|f| f.code), Some(ErrorCode::FileTooLarge));
        assert_eq!(h.client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_and_metadata() {
        let h = harness(Behavior::Respond(nv_response()));

        let no_file = h.client.analyze(None, &patient()).await;
        let no_site = h
            .client
            .analyze(
                Some(&jpeg(10)),
                &PatientMetadata {
                    lesion_location: None,
                    ..patient()
                },
            )
            .await;

        assert_eq!(no_file.failure().map(|f| f.code), Some(ErrorCode::NoFile));
        assert_eq!(
            no_site.failure().map(|f| f.code),
            Some(ErrorCode::MissingMetadata)
        );
        assert_eq!(h.client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out_without_caching() {
        let settings = AnalysisSettings {
            request_timeout: Duration::from_millis(50),
            ..AnalysisSettings::default()
        };
        let h = harness_with(Behavior::Stall, standard_generator, settings);

        let outcome = h.client.analyze(Some(&jpeg(512)), &patient()).await;

        let failure = outcome.failure().expect("failure");
        assert_eq!(failure.code, ErrorCode::Timeout);
        assert_eq!(failure.kind(), ErrorKind::Timeout);
        assert_eq!(h.cache.size(), 0);
    }

    #[tokio::test]
    async fn test_transport_failures_are_mapped_and_not_cached() {
        let h = harness(Behavior::Fail(TransportError::Connect("refused".to_string())));
        let outcome = h.client.analyze(Some(&jpeg(512)), &patient()).await;
        assert_eq!(
            outcome.failure().map(|f| f.code),
            Some(ErrorCode::ConnectionFailed)
        );
        assert_eq!(h.cache.size(), 0);

        let h = harness(Behavior::Fail(TransportError::Status {
            status: 500,
            message: None,
        }));
        let outcome = h.client.analyze(Some(&jpeg(512)), &patient()).await;
        assert_eq!(
            outcome.failure().map(|f| f.code),
            Some(ErrorCode::ProcessingFailed)
        );

        // No automatic retry.
        assert_eq!(h.client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_ranking_is_a_server_failure() {
        let h = harness(Behavior::Respond(PredictResponse { top3: vec![] }));
        let outcome = h.client.analyze(Some(&jpeg(512)), &patient()).await;
        assert_eq!(
            outcome.failure().map(|f| f.kind()),
            Some(ErrorKind::Server)
        );
        assert_eq!(h.cache.size(), 0);
    }

    #[tokio::test]
    async fn test_new_call_cancels_in_flight_request() {
        let h = harness(Behavior::StallFirstCall(nv_response()));
        let earlier = normalize(nv_response()).unwrap();
        h.cache.set("analysis:earlier", earlier.clone(), 60_000);
        let first_file = jpeg(300);
        let second_file = jpeg(400);
        let patient = patient();

        let first = h.client.analyze(Some(&first_file), &patient);
        let second = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            h.client.analyze(Some(&second_file), &patient).await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, AnalysisOutcome::Cancelled);
        assert!(first.failure().is_none());
        assert!(second.is_success());
        assert_eq!(h.client.transport().calls(), 2);
        // The entry cached before the cancellation survives it.
        assert_eq!(h.cache.get("analysis:earlier"), Some(earlier));
        assert_eq!(h.cache.size(), 2);
    }

    #[tokio::test]
    async fn test_fingerprint_failure_disables_caching() {
        let h = harness_with(
            Behavior::Respond(nv_response()),
            |_| FingerprintGenerator::new(vec![Box::new(FailingStrategy)]),
            AnalysisSettings::default(),
        );

        let first = h.client.analyze(Some(&jpeg(256)), &patient()).await;
        let second = h.client.analyze(Some(&jpeg(256)), &patient()).await;

        assert!(first.is_success());
        assert!(!second.from_cache());
        assert_eq!(h.client.transport().calls(), 2);
        assert_eq!(h.cache.size(), 0);
    }

    #[tokio::test]
    async fn test_metadata_only_fingerprint_always_misses() {
        let h = harness_with(
            Behavior::Respond(nv_response()),
            |clock| FingerprintGenerator::standard(None, clock),
            AnalysisSettings::default(),
        );
        let file = NoRangeFile(jpeg(256));

        let first = h.client.analyze(Some(&file), &patient()).await;
        h.clock.advance(1);
        let second = h.client.analyze(Some(&file), &patient()).await;

        let AnalysisOutcome::Completed(report) = &first else {
            panic!("expected a completed analysis, got {:?}", first);
        };
        assert_eq!(
            report.fingerprint.as_ref().map(|f| f.method),
            Some(FingerprintMethod::MetadataOnly)
        );
        assert!(second.is_success());
        assert!(!second.from_cache());
        assert_eq!(h.client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_health_result_is_reused_for_thirty_seconds() {
        let h = harness(Behavior::Respond(nv_response()));

        let first = h.client.check_health().await;
        h.clock.advance(29_999);
        let second = h.client.check_health().await;
        assert!(first.healthy);
        assert_eq!(first, second);
        assert_eq!(h.client.transport().health_calls.load(Ordering::SeqCst), 1);

        h.clock.advance(1);
        h.client.check_health().await;
        assert_eq!(h.client.transport().health_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unhealthy_service() {
        let clock = Arc::new(ManualClock::new(0));
        let mut transport = MockTransport::new(Behavior::Stall);
        transport.healthy = false;
        let client = AnalysisClient::new(
            transport,
            FingerprintGenerator::default(),
            Arc::new(ResultCache::new(clock)),
            AnalysisSettings::default(),
        );

        let status = client.check_health().await;
        assert!(!status.healthy);
        assert!(status.detail.is_some());
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let h = harness(Behavior::Respond(nv_response()));
        h.client.analyze(Some(&jpeg(128)), &patient()).await;
        h.client.check_health().await;
        assert_eq!(h.client.cache_size(), 1);

        h.client.clear_cache();
        assert_eq!(h.client.cache_size(), 0);

        h.client.check_health().await;
        assert_eq!(h.client.transport().health_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_outcome_json_shape() {
        let h = harness(Behavior::Respond(nv_response()));
        h.client.analyze(Some(&jpeg(128)), &patient()).await;
        let cached = h.client.analyze(Some(&jpeg(128)), &patient()).await;

        let json = cached.to_json();
        assert_eq!(json["success"], true);
        assert_eq!(json["fromCache"], true);
        assert_eq!(json["result"]["most_likely"]["class"], "nv");
        assert_eq!(json["result"]["risk"], "medium");
    }
}

//! Description pipeline: validate → encode → describe → record → speak.
//!
//! [`DescriptionPipeline`] owns the [`SharedRecords`] store and drives each
//! accepted file through its own tokio task.
//!
//! # Pipeline flow
//!
//! ```text
//! submit(file)
//!   ├─ validate ── rejected ──▶ Err(ValidationError)            (no record)
//!   └─ accepted
//!        ├─ insert Pending record (front), announce "analysing …"
//!        └─ spawn: encode → service.generate (async)
//!              ├─ Ok  → record Ready, sleep(result_delay), speak description
//!              └─ Err → record Failed (fixed message), speak error + detail
//! ```
//!
//! Any number of submissions may be in flight at once. Each task only
//! touches its own record, looked up by id, so completion order never
//! affects the newest-first order of the store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{AppConfig, DescriptionConfig};
use crate::intake::{encode, validate_file, DetailLevel, EncodedRequest, ImageFile, ValidationError};
use crate::lock;
use crate::speech::{EspeakBackend, SpeechController, UtteranceId};
use crate::vision::{DescribeError, DescriptionService, GeminiDescriptionService};

use super::announce::Phrasebook;
use super::records::{
    new_shared_records, DescriptionRecord, RecordId, RecordStatus, SharedRecords,
};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Handle to one accepted file's in-flight request.
///
/// Dropping it does not cancel the request; description requests always run
/// to completion.
#[derive(Debug)]
pub struct Submission {
    /// Id of the record created for the file.
    pub id: RecordId,
    handle: JoinHandle<RecordStatus>,
}

impl Submission {
    /// Wait for the record to reach its terminal status.
    pub async fn finished(self) -> RecordStatus {
        match self.handle.await {
            Ok(status) => status,
            Err(e) => {
                log::error!("pipeline: request task for {} ended abnormally: {e}", self.id);
                RecordStatus::Failed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptionPipeline
// ---------------------------------------------------------------------------

/// Orchestrates validation, description requests and spoken delivery.
///
/// ```rust,no_run
/// use image_narrator::config::AppConfig;
/// use image_narrator::intake::ImageFile;
/// use image_narrator::pipeline::DescriptionPipeline;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pipeline = DescriptionPipeline::from_config(&AppConfig::load()?);
///
/// let file = ImageFile::from_path(std::path::Path::new("photo.png"))?;
/// let submission = pipeline.submit(file)?;
/// let status = submission.finished().await;
/// println!("{status:?}: {:?}", pipeline.latest().map(|r| r.description));
/// # Ok(())
/// # }
/// ```
pub struct DescriptionPipeline {
    records: SharedRecords,
    service: Arc<dyn DescriptionService>,
    speech: SpeechController,
    detail_level: Mutex<DetailLevel>,
    language: String,
    phrases: Phrasebook,
    result_delay: Duration,
}

impl DescriptionPipeline {
    /// Create a pipeline.
    ///
    /// # Arguments
    ///
    /// * `service` — vision backend (e.g. `GeminiDescriptionService`).
    /// * `speech`  — shared speech controller; the host may keep a clone.
    /// * `config`  — detail level, language and result delay.
    pub fn new(
        service: Arc<dyn DescriptionService>,
        speech: SpeechController,
        config: &DescriptionConfig,
    ) -> Self {
        Self {
            records: new_shared_records(),
            service,
            speech,
            detail_level: Mutex::new(config.detail_level),
            language: config.language.clone(),
            phrases: Phrasebook::new(&config.language),
            result_delay: config.result_delay(),
        }
    }

    /// Wire the production backends (Gemini + espeak) from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let service = Arc::new(GeminiDescriptionService::from_config(&config.vision));
        let backend = Arc::new(EspeakBackend::from_config(&config.speech));

        let speech = SpeechController::new(backend, config.speech.settings.clone());
        Self::new(service, speech, &config.description)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Accept a file and start describing it.
    ///
    /// Rejected files return the validation error and leave the record store
    /// untouched. Must be called inside a tokio runtime.
    pub fn submit(&self, file: ImageFile) -> Result<Submission, ValidationError> {
        if let Err(e) = validate_file(&file) {
            log::info!("pipeline: rejected {}: {e}", file.name);
            return Err(e);
        }

        let id = lock(&self.records).insert(DescriptionRecord::pending(&file.name));
        log::info!(
            "pipeline: {id} accepted {} ({} bytes, {})",
            file.name,
            file.size(),
            file.media_type
        );

        self.speech.speak(&self.phrases.analysing(&file.name));

        let level = self.detail_level();
        let request = encode(&file.bytes, &file.media_type, level, &self.language);

        let task = RequestTask {
            id,
            file_name: file.name,
            records: Arc::clone(&self.records),
            service: Arc::clone(&self.service),
            speech: self.speech.clone(),
            phrases: self.phrases,
            result_delay: self.result_delay,
        };
        let handle = tokio::spawn(task.run(request));

        Ok(Submission { id, handle })
    }

    // -----------------------------------------------------------------------
    // Record views
    // -----------------------------------------------------------------------

    /// Every record, newest first.
    pub fn records(&self) -> Vec<DescriptionRecord> {
        lock(&self.records).snapshot()
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<DescriptionRecord> {
        lock(&self.records).latest().cloned()
    }

    pub fn record(&self, id: RecordId) -> Option<DescriptionRecord> {
        lock(&self.records).get(id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }

    /// Records still waiting on the vision service.
    pub fn pending_count(&self) -> usize {
        lock(&self.records).pending_count()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn detail_level(&self) -> DetailLevel {
        *lock(&self.detail_level)
    }

    /// Applies to files submitted from now on; existing records keep theirs.
    pub fn set_detail_level(&self, level: DetailLevel) {
        *lock(&self.detail_level) = level;
        log::debug!("pipeline: detail level set to {}", level.label());
    }

    // -----------------------------------------------------------------------
    // Speech helpers for the host
    // -----------------------------------------------------------------------

    pub fn speech(&self) -> &SpeechController {
        &self.speech
    }

    /// Startup announcement.
    pub fn welcome(&self) -> Option<UtteranceId> {
        self.speech.speak(self.phrases.welcome())
    }

    /// Speak a fixed sample sentence with the current settings.
    pub fn test_speech(&self) -> Option<UtteranceId> {
        self.speech.speak(self.phrases.test_sentence())
    }

    /// Read a record's description aloud.
    ///
    /// Returns `false` for unknown ids, pending records and records without
    /// text.
    pub fn read_record(&self, id: RecordId) -> bool {
        let text = match lock(&self.records).get(id) {
            Some(record) if !record.is_pending() => record.description.clone(),
            _ => return false,
        };
        self.speech.speak(&text).is_some()
    }

    /// Stop if something is being read, otherwise read the record.
    ///
    /// Returns `true` when reading started.
    pub fn toggle_read(&self, id: RecordId) -> bool {
        if self.speech.stop() {
            return false;
        }
        self.read_record(id)
    }

    pub fn stop_speech(&self) -> bool {
        self.speech.stop()
    }
}

// ---------------------------------------------------------------------------
// RequestTask
// ---------------------------------------------------------------------------

/// Everything one in-flight request needs, moved into its task.
struct RequestTask {
    id: RecordId,
    file_name: String,
    records: SharedRecords,
    service: Arc<dyn DescriptionService>,
    speech: SpeechController,
    phrases: Phrasebook,
    result_delay: Duration,
}

impl RequestTask {
    async fn run(self, request: EncodedRequest) -> RecordStatus {
        // Own task, so a panicking service still ends in a record update.
        let service = Arc::clone(&self.service);
        let generation = tokio::spawn(async move { service.generate(&request).await });

        let outcome = match generation.await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(DescribeError::EmptyResult),
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(DescribeError::Transport(format!(
                "description request ended abnormally: {e}"
            ))),
        };

        match outcome {
            Ok(text) => self.complete(&text).await,
            Err(e) => self.fail(&e),
        }
    }

    async fn complete(&self, text: &str) -> RecordStatus {
        let updated = lock(&self.records).mark_ready(self.id, text);
        if let Err(e) = updated {
            log::error!("pipeline: {e}");
            return RecordStatus::Failed;
        }
        log::info!("pipeline: {} ready ({} chars)", self.id, text.len());

        tokio::time::sleep(self.result_delay).await;
        self.speech
            .speak(&self.phrases.description(&self.file_name, text));
        RecordStatus::Ready
    }

    fn fail(&self, error: &DescribeError) -> RecordStatus {
        log::warn!("pipeline: {} failed: {error}", self.id);

        let message = self.phrases.failure_message(error.is_auth());
        let updated = lock(&self.records).mark_failed(self.id, message);
        if let Err(e) = updated {
            log::error!("pipeline: {e}");
        }

        self.speech.speak(&self.phrases.error(&error.to_string()));
        RecordStatus::Failed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::speech::{MockSpeechBackend, SpeechBackend, SpeechSettings, SpeechState};
    use crate::vision::MockDescriptionService;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    type Gate = oneshot::Receiver<Result<String, DescribeError>>;

    /// Holds each request until the test releases it, keyed by image bytes.
    struct GatedService {
        gates: std::sync::Mutex<HashMap<Vec<u8>, Gate>>,
    }

    #[async_trait]
    impl DescriptionService for GatedService {
        async fn generate(&self, request: &EncodedRequest) -> Result<String, DescribeError> {
            let key = request.decode_data().unwrap();
            let gate = self.gates.lock().unwrap().remove(&key).expect("no gate for image");
            gate.await
                .unwrap_or_else(|_| Err(DescribeError::Transport("gate dropped".into())))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn quick_config() -> DescriptionConfig {
        DescriptionConfig {
            result_delay_ms: 0,
            ..DescriptionConfig::default()
        }
    }

    fn make_pipeline(
        service: Arc<dyn DescriptionService>,
        backend: &Arc<MockSpeechBackend>,
    ) -> DescriptionPipeline {
        let speech = SpeechController::new(
            Arc::clone(backend) as Arc<dyn SpeechBackend>,
            SpeechSettings::default(),
        );
        DescriptionPipeline::new(service, speech, &quick_config())
    }

    fn png(name: &str, bytes: &[u8]) -> ImageFile {
        ImageFile::new(name, "image/png", bytes.to_vec())
    }

    async fn wait_idle(pipeline: &DescriptionPipeline) {
        let mut rx = pipeline.speech().subscribe();
        rx.wait_for(|s| *s == SpeechState::Idle).await.unwrap();
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn photo_is_described_and_read_aloud() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("A cat on a couch.")), &backend);

        let file = ImageFile::new("photo.png", "image/png", vec![7u8; 2 * 1024 * 1024]);
        let submission = pipeline.submit(file).unwrap();

        let record = pipeline.record(submission.id).unwrap();
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(record.file_name, "photo.png");
        assert!(record.description.is_empty());

        assert_eq!(submission.finished().await, RecordStatus::Ready);
        wait_idle(&pipeline).await;

        let record = pipeline.latest().unwrap();
        assert_eq!(record.status, RecordStatus::Ready);
        assert_eq!(record.description, "A cat on a couch.");

        let spoken = backend.spoken_texts();
        assert!(spoken.iter().any(|t| t.contains("Analysing image photo.png")));
        let last = spoken.last().unwrap();
        assert!(last.contains("cat") && last.contains("couch"));
    }

    #[tokio::test]
    async fn unsupported_type_creates_no_record() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let service = Arc::new(MockDescriptionService::ok("unused"));
        let pipeline = make_pipeline(Arc::clone(&service) as Arc<dyn DescriptionService>, &backend);

        let err = pipeline
            .submit(ImageFile::new("doc.pdf", "application/pdf", vec![1, 2, 3]))
            .unwrap_err();

        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
        assert_eq!(pipeline.len(), 0);
        assert!(service.requests().is_empty());
        tokio::task::yield_now().await;
        assert!(backend.spoken().is_empty());
    }

    #[tokio::test]
    async fn oversized_file_creates_no_record() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("unused")), &backend);

        let big = ImageFile::new("huge.jpg", "image/jpeg", vec![0u8; 10 * 1024 * 1024 + 1]);
        assert!(matches!(
            pipeline.submit(big),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(pipeline.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_marks_record_failed_and_speaks_detail() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(
            Arc::new(MockDescriptionService::failing(DescribeError::Transport(
                "connection refused".into(),
            ))),
            &backend,
        );

        let submission = pipeline.submit(png("a.png", b"a")).unwrap();
        assert_eq!(submission.finished().await, RecordStatus::Failed);
        wait_idle(&pipeline).await;

        let record = pipeline.latest().unwrap();
        assert_eq!(record.status, RecordStatus::Failed);
        assert_eq!(record.description, "Error while analysing the image.");
        assert!(!record.description.contains("connection refused"));

        let last = backend.spoken_texts().pop().unwrap();
        assert!(last.contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_result_is_a_failure() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(
            Arc::new(MockDescriptionService::failing(DescribeError::EmptyResult)),
            &backend,
        );

        let submission = pipeline.submit(png("a.png", b"a")).unwrap();
        assert_eq!(submission.finished().await, RecordStatus::Failed);
        assert_eq!(
            pipeline.latest().unwrap().description,
            "Error while analysing the image."
        );
    }

    #[tokio::test]
    async fn blank_service_text_is_treated_as_empty_result() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("   ")), &backend);

        let submission = pipeline.submit(png("a.png", b"a")).unwrap();
        assert_eq!(submission.finished().await, RecordStatus::Failed);
    }

    struct PanickingService;

    #[async_trait]
    impl DescriptionService for PanickingService {
        async fn generate(&self, _request: &EncodedRequest) -> Result<String, DescribeError> {
            panic!("backend bug");
        }
    }

    #[tokio::test]
    async fn panicking_service_marks_record_failed() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(PanickingService), &backend);

        let submission = pipeline.submit(png("p.png", b"p")).unwrap();
        let id = submission.id;
        assert_eq!(submission.finished().await, RecordStatus::Failed);
        wait_idle(&pipeline).await;

        let record = pipeline.record(id).unwrap();
        assert_eq!(record.status, RecordStatus::Failed);
        assert_eq!(record.description, "Error while analysing the image.");
        assert_eq!(pipeline.pending_count(), 0);

        let last = backend.spoken_texts().pop().unwrap();
        assert!(last.starts_with("An error occurred while analysing the image"));
    }

    #[tokio::test]
    async fn auth_failure_has_its_own_message() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(
            Arc::new(MockDescriptionService::failing(DescribeError::Auth(
                "no API key".into(),
            ))),
            &backend,
        );

        let submission = pipeline.submit(png("a.png", b"a")).unwrap();
        assert_eq!(submission.finished().await, RecordStatus::Failed);

        let record = pipeline.latest().unwrap();
        assert!(record.description.contains("API key"));
        assert_ne!(record.description, "Error while analysing the image.");
    }

    #[tokio::test]
    async fn concurrent_requests_resolve_out_of_order() {
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let (tx_c, rx_c) = oneshot::channel();
        let gates = HashMap::from([
            (b"a".to_vec(), rx_a),
            (b"b".to_vec(), rx_b),
            (b"c".to_vec(), rx_c),
        ]);
        let service = Arc::new(GatedService {
            gates: std::sync::Mutex::new(gates),
        });
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(service, &backend);

        let a = pipeline.submit(png("a.png", b"a")).unwrap();
        let b = pipeline.submit(png("b.png", b"b")).unwrap();
        let c = pipeline.submit(png("c.png", b"c")).unwrap();
        let (id_a, id_b, id_c) = (a.id, b.id, c.id);

        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.pending_count(), 3);

        tx_b.send(Ok("B described".into())).unwrap();
        assert_eq!(b.finished().await, RecordStatus::Ready);
        assert_eq!(pipeline.record(id_b).unwrap().description, "B described");
        assert!(pipeline.record(id_a).unwrap().is_pending());
        assert!(pipeline.record(id_c).unwrap().is_pending());

        tx_c.send(Err(DescribeError::Transport("boom".into()))).unwrap();
        assert_eq!(c.finished().await, RecordStatus::Failed);
        assert!(pipeline.record(id_a).unwrap().is_pending());
        assert_eq!(pipeline.record(id_b).unwrap().status, RecordStatus::Ready);

        tx_a.send(Ok("A described".into())).unwrap();
        assert_eq!(a.finished().await, RecordStatus::Ready);

        let records = pipeline.records();
        let order: Vec<RecordId> = records.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![id_c, id_b, id_a]);
        assert_eq!(records[0].status, RecordStatus::Failed);
        assert_eq!(records[1].description, "B described");
        assert_eq!(records[2].description, "A described");
        assert_eq!(pipeline.pending_count(), 0);
    }

    #[tokio::test]
    async fn many_submissions_keep_unique_ids() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("text")), &backend);

        let submissions: Vec<Submission> = (0..10)
            .map(|i| pipeline.submit(png(&format!("{i}.png"), &[i as u8])).unwrap())
            .collect();
        for s in submissions {
            assert_eq!(s.finished().await, RecordStatus::Ready);
        }

        let records = pipeline.records();
        assert_eq!(records.len(), 10);
        let mut ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert_eq!(records[0].file_name, "9.png");
        assert_eq!(records[9].file_name, "0.png");
    }

    #[tokio::test]
    async fn detail_level_applies_to_later_submissions_only() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let service = Arc::new(MockDescriptionService::ok("text"));
        let pipeline = make_pipeline(Arc::clone(&service) as Arc<dyn DescriptionService>, &backend);

        let first = pipeline.submit(png("1.png", b"1")).unwrap();
        let first_id = first.id;
        first.finished().await;
        let before = pipeline.record(first_id).unwrap();

        pipeline.set_detail_level(DetailLevel::Detailed);
        assert_eq!(pipeline.detail_level(), DetailLevel::Detailed);
        pipeline.submit(png("2.png", b"2")).unwrap().finished().await;

        let budgets: Vec<u32> = service.requests().iter().map(|r| r.max_output_tokens).collect();
        assert_eq!(budgets, vec![500, 1000]);
        assert_eq!(pipeline.record(first_id).unwrap(), before);
    }

    #[tokio::test]
    async fn works_without_speech_support() {
        let backend = Arc::new(MockSpeechBackend::unsupported());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("A tree.")), &backend);

        let submission = pipeline.submit(png("tree.png", b"t")).unwrap();
        assert_eq!(submission.finished().await, RecordStatus::Ready);
        assert_eq!(pipeline.latest().unwrap().description, "A tree.");
        assert!(backend.spoken().is_empty());
        assert!(!pipeline.speech().is_speaking());
    }

    #[tokio::test]
    async fn result_is_spoken_after_the_delay() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let speech = SpeechController::new(
            Arc::clone(&backend) as Arc<dyn SpeechBackend>,
            SpeechSettings::default(),
        );
        let config = DescriptionConfig {
            result_delay_ms: 20,
            ..DescriptionConfig::default()
        };
        let pipeline =
            DescriptionPipeline::new(Arc::new(MockDescriptionService::ok("A boat.")), speech, &config);

        let started = std::time::Instant::now();
        pipeline.submit(png("boat.png", b"b")).unwrap().finished().await;
        assert!(started.elapsed() >= Duration::from_millis(20));
        wait_idle(&pipeline).await;
        assert!(backend.spoken_texts().last().unwrap().contains("A boat."));
    }

    #[tokio::test]
    async fn read_record_speaks_description() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("A lake.")), &backend);

        let submission = pipeline.submit(png("lake.png", b"l")).unwrap();
        let id = submission.id;
        submission.finished().await;
        wait_idle(&pipeline).await;

        assert!(pipeline.read_record(id));
        wait_idle(&pipeline).await;
        assert_eq!(backend.spoken_texts().last().unwrap(), "A lake.");

        assert!(!pipeline.read_record(RecordId::new()));
    }

    #[tokio::test]
    async fn pending_record_is_not_read() {
        let (_tx, rx) = oneshot::channel();
        let service = Arc::new(GatedService {
            gates: std::sync::Mutex::new(HashMap::from([(b"p".to_vec(), rx)])),
        });
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(service, &backend);

        let submission = pipeline.submit(png("p.png", b"p")).unwrap();
        assert!(!pipeline.read_record(submission.id));
    }

    #[tokio::test]
    async fn toggle_read_stops_when_speaking() {
        let backend = Arc::new(MockSpeechBackend::holding());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("A road.")), &backend);

        let submission = pipeline.submit(png("road.png", b"r")).unwrap();
        let id = submission.id;
        submission.finished().await;
        assert!(pipeline.speech().is_speaking());

        assert!(!pipeline.toggle_read(id));
        assert!(!pipeline.speech().is_speaking());

        assert!(pipeline.toggle_read(id));
        assert!(pipeline.speech().is_speaking());
        assert!(pipeline.stop_speech());
    }

    #[tokio::test]
    async fn welcome_and_test_speech_are_spoken() {
        let backend = Arc::new(MockSpeechBackend::instant());
        let pipeline = make_pipeline(Arc::new(MockDescriptionService::ok("x")), &backend);

        assert!(pipeline.welcome().is_some());
        wait_idle(&pipeline).await;
        assert!(pipeline.test_speech().is_some());
        wait_idle(&pipeline).await;

        let spoken = backend.spoken_texts();
        assert_eq!(spoken.len(), 2);
        assert!(spoken[1].contains("speech synthesis test"));
    }
}

//! Description pipeline for image-narrator.
//!
//! This module wires the full intake → vision → speech flow and exposes the
//! record store the host UI lists.
//!
//! # Architecture
//!
//! ```text
//! host: submit(ImageFile)
//!        │
//!        ▼
//! DescriptionPipeline::submit()
//!        ├─ validate_file            → Err(ValidationError), nothing stored
//!        ├─ RecordStore::insert      → Pending (front)
//!        ├─ SpeechController::speak  → "Analysing image …"
//!        └─ tokio::spawn(RequestTask)
//!              ├─ encode + DescriptionService::generate
//!              ├─ mark_ready / mark_failed (by RecordId)
//!              └─ SpeechController::speak → description or error
//!
//! SharedRecords (Arc<Mutex<RecordStore>>) ←─── snapshots for the host
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use image_narrator::config::AppConfig;
//! use image_narrator::intake::ImageFile;
//! use image_narrator::pipeline::DescriptionPipeline;
//!
//! #[tokio::main]
//! async fn main() {
//!     image_narrator::init_logging();
//!     let pipeline = DescriptionPipeline::from_config(&AppConfig::default());
//!     pipeline.welcome();
//!
//!     let file = ImageFile::new("photo.png", "image/png", std::fs::read("photo.png").unwrap());
//!     match pipeline.submit(file) {
//!         Ok(submission) => {
//!             submission.finished().await;
//!         }
//!         Err(e) => eprintln!("{e}"),
//!     }
//!
//!     for record in pipeline.records() {
//!         println!("{} [{}] {}", record.file_name, record.status.label(), record.description);
//!     }
//! }
//! ```

mod announce;
pub mod records;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use records::{
    new_shared_records, DescriptionRecord, RecordError, RecordId, RecordStatus, RecordStore,
    SharedRecords,
};
pub use runner::{DescriptionPipeline, Submission};

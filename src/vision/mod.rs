//! Vision-language backends that turn an encoded image into a description.
//!
//! This module provides:
//! * [`DescriptionService`] — async trait implemented by every backend.
//! * [`GeminiDescriptionService`] — Gemini `generateContent` REST backend.
//! * [`DescribeError`] — `Auth`, `Transport` and `EmptyResult` failures.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use image_narrator::config::AppConfig;
//! use image_narrator::intake::{encode, DetailLevel};
//! use image_narrator::vision::{DescriptionService, GeminiDescriptionService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let service = GeminiDescriptionService::from_config(&config.vision);
//!
//!     let bytes = std::fs::read("photo.png").unwrap();
//!     let request = encode(&bytes, "image/png", DetailLevel::Moderate, "en");
//!     match service.generate(&request).await {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod gemini;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gemini::{GeminiDescriptionService, API_KEY_ENV};
pub use service::{DescribeError, DescriptionService};

#[cfg(test)]
pub use service::MockDescriptionService;

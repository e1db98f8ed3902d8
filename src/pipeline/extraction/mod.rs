pub mod types;
pub mod normalize;
pub mod classify;
pub mod enrich;
pub mod strategy;
pub mod fallback;
pub mod metadata;
pub mod ocr;
pub mod orchestrator;

pub use types::*;
pub use metadata::*;
pub use ocr::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),
}

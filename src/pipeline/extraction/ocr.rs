use super::ExtractionError;

/// Raw OCR result from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPageResult {
    pub text: String,
    /// Mean recognition confidence, 0.0 to 1.0.
    pub confidence: f32,
}

/// OCR engine abstraction. The engine binding lives outside this crate;
/// tests use [`MockOcrEngine`].
pub trait OcrEngine {
    fn recognize(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// Mock OCR engine for unit testing without a real engine.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

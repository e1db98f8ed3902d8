pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod pipeline_config; // Extraction thresholds
pub mod prescriptions; // Upload → OCR → medicine list

use tracing_subscriber::EnvFilter;

pub use pipeline::extraction::{
    extract_doctor_name, extract_hospital_name, extract_medicines, extract_medicines_with,
    extract_prescription, CandidateMedicine, ExtractionResult, PrescriptionExtraction,
};
pub use pipeline_config::ExtractionConfig;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

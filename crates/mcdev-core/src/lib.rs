pub mod error;
pub mod i18n;
pub mod types;

// Re-export commonly used items
pub use error::{AnalyzerError, ErrorInfo, Result};
pub use i18n::Language;
pub use types::{Finding, JvmFlagSignal, OutputFormat};

#[macro_use]
pub mod logger;

pub mod config;
pub mod contract;
pub mod error;
pub mod facade;
pub mod llm;
pub mod postprocess;
pub mod prompt;
pub mod util;

// Re-exports for convenience
pub use config::ExaminerConfig;
pub use contract::Operation;
pub use error::{ExaminerError, Result};
pub use facade::{Envelope, Examiner};
pub use llm::{LlmClient, ReasoningService};

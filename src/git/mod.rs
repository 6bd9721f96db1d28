pub mod executor;
pub mod parser;
pub mod repository;
pub mod version;

// Re-export commonly used types
pub use executor::{CommandOutput, DEFAULT_GIT_EXECUTABLE, GitExecutor};
pub use parser::{STATUS_LABELS, StatusCategory, StatusReport, parse_status};
pub use repository::TmpRepo;
pub use version::GitVersion;

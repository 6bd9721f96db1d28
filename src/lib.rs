//! Disposable git repositories for test fixtures.
//!
//! ```no_run
//! use std::io::Write;
//! use tmprepo::TmpRepo;
//!
//! let mut repo = TmpRepo::new()?;
//! repo.create_file_with("foo.txt", |f| f.write_all(b"foobar"))?;
//! repo.add_all()?;
//! repo.commit("Committing foobar")?;
//! assert!(repo.status()?.is_clean());
//! repo.unlink();
//! # Ok::<(), tmprepo::GitError>(())
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod git;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{GitError, Result};
pub use git::{GitVersion, StatusCategory, StatusReport, TmpRepo};

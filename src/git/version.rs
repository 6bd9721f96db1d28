use crate::error::{GitError, Result};
use crate::git::executor::{DEFAULT_GIT_EXECUTABLE, GitExecutor};

/// Minimum required git version
const MIN_GIT_VERSION: (u32, u32) = (2, 20);

/// Represents a git version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// Detect the version of the `git` on PATH
    pub fn detect() -> Result<Self> {
        Self::detect_with(DEFAULT_GIT_EXECUTABLE)
    }

    /// Detect the version of a specific executable
    pub fn detect_with(executable: &str) -> Result<Self> {
        Self::detect_in(&GitExecutor::with_executable(std::env::temp_dir(), executable))
    }

    /// Detect the version of the executable an executor drives
    pub fn detect_in(executor: &GitExecutor) -> Result<Self> {
        let output = executor.run(["--version"])?;
        Self::parse(&output)
    }

    /// Parse git version from string like "git version 2.39.2"
    pub fn parse(version_str: &str) -> Result<Self> {
        // "git version X.Y.Z", "git version X.Y.Z.windows.1", "git version X.Y.Z (Apple Git-146)"
        let parts: Vec<&str> = version_str.split_whitespace().collect();

        if parts.len() < 3 || parts[0] != "git" || parts[1] != "version" {
            return Err(GitError::ParseError(format!(
                "Unexpected git version format: {}",
                version_str.trim()
            )));
        }

        let nums: Vec<&str> = parts[2].split('.').collect();
        if nums.len() < 2 {
            return Err(GitError::ParseError(format!(
                "Invalid version number format: {}",
                parts[2]
            )));
        }

        let major = nums[0]
            .parse::<u32>()
            .map_err(|_| GitError::ParseError(format!("Invalid major version: {}", nums[0])))?;

        let minor = nums[1]
            .parse::<u32>()
            .map_err(|_| GitError::ParseError(format!("Invalid minor version: {}", nums[1])))?;

        // Patch may carry a suffix such as "2-rc1"
        let patch = nums
            .get(2)
            .and_then(|p| {
                let digits: String = p.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u32>().ok()
            })
            .unwrap_or(0);

        Ok(GitVersion {
            major,
            minor,
            patch,
        })
    }

    /// Check if this version meets minimum requirements
    pub fn is_supported(&self) -> bool {
        self.major > MIN_GIT_VERSION.0
            || (self.major == MIN_GIT_VERSION.0 && self.minor >= MIN_GIT_VERSION.1)
    }

    /// Detect and require a supported version
    pub fn validate_with(executable: &str) -> Result<Self> {
        let version = Self::detect_with(executable)?;

        if !version.is_supported() {
            return Err(GitError::GitVersionTooOld(version.to_string()));
        }

        Ok(version)
    }
}

impl std::fmt::Display for GitVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

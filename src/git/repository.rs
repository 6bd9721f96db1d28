use crate::audit::AuditLogger;
use crate::config::Config;
use crate::error::{GitError, Result};
use crate::git::executor::GitExecutor;
use crate::git::parser::{self, StatusReport};
use crate::git::version::GitVersion;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// A throwaway git repository for tests.
///
/// The directory is created and initialized on construction and stays on disk
/// until [`TmpRepo::unlink`] is called. Every operation runs the configured git
/// executable with the repository as the child's working directory.
#[derive(Debug)]
pub struct TmpRepo {
    path: PathBuf,
    executor: GitExecutor,
    unlinked: bool,
}

impl TmpRepo {
    /// Create a repository in a fresh directory under the system temp dir
    pub fn new() -> Result<Self> {
        Self::with_config(None::<&Path>, Config::default_config())
    }

    /// Create (if needed) and initialize a repository at `path`
    pub fn at<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(Some(path), Config::default_config())
    }

    /// Create a repository at `path`, or in a fresh directory under the
    /// configured temp root when `path` is `None`
    pub fn with_config<P: AsRef<Path>>(path: Option<P>, config: Config) -> Result<Self> {
        config.validate()?;

        let path = match path {
            Some(path) => {
                fs::create_dir_all(path.as_ref())?;
                std::path::absolute(path.as_ref())?
            }
            None => Self::random_dir(&config.temp_root())?,
        };

        let mut executor = GitExecutor::with_executable(&path, config.git.executable.clone());
        if let Some(log_path) = config.log_path() {
            executor = executor.with_logger(AuditLogger::with_path(log_path)?);
        }

        let repo = Self {
            path,
            executor,
            unlinked: false,
        };
        repo.initialize(&config)?;

        Ok(repo)
    }

    /// Allocate a uniquely named directory that outlives this call
    fn random_dir(root: &Path) -> Result<PathBuf> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("tmprepo-")
            .tempdir_in(root)?;
        Ok(std::path::absolute(dir.keep())?)
    }

    fn initialize(&self, config: &Config) -> Result<()> {
        match &config.git.initial_branch {
            Some(branch) => {
                let flag = format!("--initial-branch={}", branch);
                self.executor.run(["init", flag.as_str()])?
            }
            None => self.executor.run(["init"])?,
        };

        if let Some(name) = &config.git.user_name {
            self.executor.run(["config", "user.name", name.as_str()])?;
        }
        if let Some(email) = &config.git.user_email {
            self.executor.run(["config", "user.email", email.as_str()])?;
        }

        Ok(())
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the git executor for this repository
    pub fn executor(&self) -> &GitExecutor {
        &self.executor
    }

    /// Version of the executable this repository runs
    pub fn tool_version(&self) -> Result<GitVersion> {
        self.ensure_live()?;
        GitVersion::detect_in(&self.executor)
    }

    /// Whether [`TmpRepo::unlink`] has been called
    pub fn is_unlinked(&self) -> bool {
        self.unlinked
    }

    fn ensure_live(&self) -> Result<()> {
        if self.unlinked {
            return Err(GitError::Unlinked(self.path.clone()));
        }
        Ok(())
    }

    /// Remove the repository directory and everything in it.
    ///
    /// Safe to call repeatedly and when the directory is already gone. After
    /// this, every other operation fails with [`GitError::Unlinked`].
    pub fn unlink(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
        self.unlinked = true;
    }

    /// Create or truncate `name` inside the repository and hand back the open file.
    ///
    /// `name` must be relative and stay inside the repository; absolute paths and
    /// `..` components fail with [`std::io::ErrorKind::InvalidInput`].
    pub fn create_file<N: AsRef<Path>>(&self, name: N) -> Result<File> {
        self.ensure_live()?;

        let name = name.as_ref();
        let inside = name
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside {
            return Err(GitError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is outside the repository", name.display()),
            )));
        }

        Ok(File::create(self.path.join(name))?)
    }

    /// Create or truncate `name`, let `writer` fill it, then flush and close it
    pub fn create_file_with<N, F>(&self, name: N, writer: F) -> Result<()>
    where
        N: AsRef<Path>,
        F: FnOnce(&mut File) -> std::io::Result<()>,
    {
        let mut file = self.create_file(name)?;
        writer(&mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Stage every change in the working tree (`add -A`)
    pub fn add_all(&self) -> Result<String> {
        self.git(["add", "-A"])
    }

    /// Commit the index. The message is passed as a single argument and is
    /// stored verbatim, quotes and shell metacharacters included.
    pub fn commit(&self, message: &str) -> Result<String> {
        self.git(["commit", "-m", message])
    }

    /// Check out an existing branch, tag or commit
    pub fn checkout(&self, reference: &str) -> Result<String> {
        self.git(["checkout", reference])
    }

    /// Create a branch at HEAD and switch to it
    pub fn create_branch(&self, name: &str) -> Result<String> {
        self.git(["checkout", "-b", name])
    }

    /// Name of the checked-out branch, or `HEAD` when detached
    pub fn current_branch(&self) -> Result<String> {
        let output = self.git(["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(output.trim().to_string())
    }

    /// Parsed `git status`
    pub fn status(&self) -> Result<StatusReport> {
        let output = self.git(["status"])?;
        Ok(parser::parse_status(&output))
    }

    /// Run any git subcommand and return its combined output
    pub fn git<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.ensure_live()?;
        self.executor.run(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &Path) -> Config {
        let mut config = Config::default_config();
        config.behavior.temp_root = Some(root.to_path_buf());
        config
    }

    #[test]
    fn test_new_initializes_repository() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::with_config(None::<&Path>, config_in(root.path())).unwrap();

        assert!(repo.path().is_absolute());
        assert!(repo.path().starts_with(root.path()));
        assert!(repo.path().join(".git").is_dir());
        assert!(!repo.is_unlinked());
    }

    #[test]
    fn test_fresh_paths_are_unique() {
        let root = TempDir::new().unwrap();
        let first = TmpRepo::with_config(None::<&Path>, config_in(root.path())).unwrap();
        let second = TmpRepo::with_config(None::<&Path>, config_in(root.path())).unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_at_creates_missing_parents() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("a").join("b").join("repo");

        let repo = TmpRepo::at(&path).unwrap();
        assert_eq!(repo.path(), path.as_path());
        assert!(path.join(".git").is_dir());
    }

    #[test]
    fn test_identity_is_configured() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();

        let name = repo.git(["config", "user.name"]).unwrap();
        let email = repo.git(["config", "user.email"]).unwrap();
        assert_eq!(name.trim(), "Test User");
        assert_eq!(email.trim(), "test@example.com");
    }

    #[test]
    fn test_initial_branch_config() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.git.initial_branch = Some("trunk".to_string());

        let repo = TmpRepo::with_config(None::<&Path>, config).unwrap();
        let head = repo.git(["symbolic-ref", "HEAD"]).unwrap();
        assert_eq!(head.trim(), "refs/heads/trunk");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.git.executable = String::new();

        let result = TmpRepo::with_config(None::<&Path>, config);
        assert!(matches!(result, Err(GitError::Config(_))));
    }

    #[test]
    fn test_missing_executable_fails_init() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(root.path());
        config.git.executable = "tmprepo-no-such-git".to_string();

        let result = TmpRepo::with_config(Some(root.path().join("repo")), config);
        assert!(matches!(result, Err(GitError::CommandFailed { .. })));
    }

    #[test]
    fn test_unlink_is_idempotent() {
        let root = TempDir::new().unwrap();
        let mut repo = TmpRepo::with_config(None::<&Path>, config_in(root.path())).unwrap();
        let path = repo.path().to_path_buf();

        repo.unlink();
        assert!(!path.exists());
        assert!(repo.is_unlinked());

        repo.unlink();
        assert!(!path.exists());
    }

    #[test]
    fn test_operations_after_unlink_fail() {
        let root = TempDir::new().unwrap();
        let mut repo = TmpRepo::with_config(None::<&Path>, config_in(root.path())).unwrap();
        repo.unlink();

        assert!(matches!(repo.add_all(), Err(GitError::Unlinked(_))));
        assert!(matches!(repo.status(), Err(GitError::Unlinked(_))));
        assert!(matches!(repo.create_file("x.txt"), Err(GitError::Unlinked(_))));
        assert!(!repo.path().exists());
    }

    #[test]
    fn test_create_file_returns_handle() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();

        let mut handle = repo.create_file("foo.txt").unwrap();
        handle.write_all(b"foobarbaz").unwrap();
        drop(handle);

        let contents = fs::read_to_string(root.path().join("foo.txt")).unwrap();
        assert_eq!(contents, "foobarbaz");
    }

    #[test]
    fn test_create_file_rejects_paths_outside_repo() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path().join("repo")).unwrap();
        let outside = root.path().join("outside.txt");

        for name in [outside.clone(), PathBuf::from("../outside.txt")] {
            match repo.create_file(&name) {
                Err(GitError::IoError(e)) => {
                    assert_eq!(e.kind(), std::io::ErrorKind::InvalidInput)
                }
                other => panic!("expected InvalidInput for {}, got {other:?}", name.display()),
            }
        }
        assert!(!outside.exists());
    }

    #[test]
    fn test_create_file_in_subdirectory() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();
        fs::create_dir(root.path().join("src")).unwrap();

        repo.create_file_with("./src/lib.rs", |f| f.write_all(b"// lib"))
            .unwrap();
        assert!(root.path().join("src").join("lib.rs").is_file());
    }

    #[test]
    fn test_create_branch_returns_stderr_text() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();
        repo.create_file_with("foo.txt", |f| f.write_all(b"foobar"))
            .unwrap();
        repo.add_all().unwrap();
        repo.commit("first").unwrap();

        // git reports the switch on stderr
        let output = repo.create_branch("x").unwrap();
        assert!(output.contains("Switched to a new branch 'x'"));
    }

    #[test]
    fn test_tool_version() {
        let root = TempDir::new().unwrap();
        let mut repo = TmpRepo::at(root.path()).unwrap();

        assert!(repo.tool_version().unwrap().is_supported());
        repo.unlink();
        assert!(matches!(repo.tool_version(), Err(GitError::Unlinked(_))));
    }

    #[test]
    fn test_create_file_with_writer() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();

        repo.create_file_with("foo.txt", |f| f.write_all(b"foobar"))
            .unwrap();

        let contents = fs::read_to_string(root.path().join("foo.txt")).unwrap();
        assert_eq!(contents, "foobar");
    }

    #[test]
    fn test_create_file_truncates() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();

        repo.create_file_with("foo.txt", |f| f.write_all(b"a long first version"))
            .unwrap();
        repo.create_file_with("foo.txt", |f| f.write_all(b"short"))
            .unwrap();

        let contents = fs::read_to_string(root.path().join("foo.txt")).unwrap();
        assert_eq!(contents, "short");
    }

    #[test]
    fn test_writer_error_propagates() {
        let root = TempDir::new().unwrap();
        let repo = TmpRepo::at(root.path()).unwrap();

        let result = repo.create_file_with("foo.txt", |_| {
            Err(std::io::Error::other("writer gave up"))
        });
        assert!(matches!(result, Err(GitError::IoError(_))));
    }

    #[test]
    fn test_commands_logged_when_enabled() {
        let root = TempDir::new().unwrap();
        let log_path = root.path().join("logs").join("commands.log");
        let mut config = config_in(root.path());
        config.behavior.log_commands = true;
        config.behavior.log_path = Some(log_path.clone());

        let repo = TmpRepo::with_config(None::<&Path>, config).unwrap();
        repo.status().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("git init"));
        assert!(content.contains("git status"));
        assert!(content.contains(&repo.path().display().to_string()));
    }
}

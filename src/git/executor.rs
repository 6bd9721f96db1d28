use crate::audit::AuditLogger;
use crate::error::{GitError, Result};
use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Executable used when none is configured
pub const DEFAULT_GIT_EXECUTABLE: &str = "git";

/// Result of executing a git command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// stdout and stderr, interleaved as the tool wrote them
    pub output: String,
    pub exit_code: i32,
    pub success: bool,
}

/// Executes git commands within a repository
#[derive(Debug, Clone)]
pub struct GitExecutor {
    repo_path: PathBuf,
    executable: String,
    logger: Option<AuditLogger>,
}

impl GitExecutor {
    /// Create a new GitExecutor for the given repository path
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self::with_executable(repo_path, DEFAULT_GIT_EXECUTABLE)
    }

    /// Create a GitExecutor that invokes a specific executable
    pub fn with_executable<P: AsRef<Path>>(repo_path: P, executable: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            executable: executable.into(),
            logger: None,
        }
    }

    /// Record every invocation to an audit log
    pub fn with_logger(mut self, logger: AuditLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Execute git with the given arguments.
    ///
    /// The repository path is handed to the child as its working directory; the
    /// current process directory is never touched. Any non-zero exit becomes
    /// [`GitError::CommandFailed`] carrying the combined output verbatim.
    pub fn execute<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();

        match self.spawn_and_capture(&args) {
            Ok((output, status)) => {
                self.log(&args, status.code());
                Self::process_output(output, status)
            }
            Err(e) => {
                self.log(&args, None);
                Err(GitError::CommandFailed {
                    output: format!("Failed to execute {}: {}", self.executable, e),
                    exit_code: None,
                })
            }
        }
    }

    /// Execute git and return only the combined output
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Ok(self.execute(args)?.output)
    }

    /// Execute a whitespace-separated command string.
    ///
    /// The string should not include the executable name.
    /// Example: `executor.execute_str("log --oneline")`. Quotes are not interpreted.
    pub fn execute_str(&self, command: &str) -> Result<CommandOutput> {
        self.execute(command.split_whitespace())
    }

    fn spawn_and_capture(&self, args: &[OsString]) -> io::Result<(String, ExitStatus)> {
        let (mut reader, writer) = io::pipe()?;

        // `cmd` owns the parent's write ends and must drop before reading to EOF
        let mut child = {
            let mut cmd = Command::new(&self.executable);
            cmd.args(args)
                .current_dir(&self.repo_path)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn()?
        };

        let mut buf = Vec::new();
        let read = reader.read_to_end(&mut buf);
        let status = child.wait()?;
        read?;

        Ok((String::from_utf8_lossy(&buf).into_owned(), status))
    }

    /// Turn a finished process into CommandOutput, or an error on non-zero exit
    fn process_output(output: String, status: ExitStatus) -> Result<CommandOutput> {
        if !status.success() {
            return Err(GitError::CommandFailed {
                output,
                exit_code: status.code(),
            });
        }

        Ok(CommandOutput {
            output,
            exit_code: status.code().unwrap_or(-1),
            success: true,
        })
    }

    fn log(&self, args: &[OsString], exit_code: Option<i32>) {
        let Some(logger) = &self.logger else {
            return;
        };

        let mut line = self.executable.clone();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }

        // Logging failures never fail the command
        let _ = logger.log_command(&line, &self.repo_path, exit_code);
    }

    /// Get the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Get the executable name
    pub fn executable(&self) -> &str {
        &self.executable
    }
}

//! Host collaborators used by an edit session.
//!
//! Each concern is a small trait so a session can run against the real
//! machine ([`OsFileSystem`], [`OsEnvironment`], [`OsProcessRunner`]) or
//! against stubs in tests.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::{env, fs};

use tracing::debug;

pub trait FileSystem {
    /// Creates a new, uniquely named, writable directory.
    fn create_temp_dir(&self, prefix: &str) -> io::Result<PathBuf>;

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

pub trait Environment {
    /// Value of `name`, `None` when unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Whether `name` resolves to an executable on the search path.
    fn lookup_executable(&self, name: &str) -> bool;
}

pub trait ProcessRunner {
    /// Runs `program` with `args` on the caller's own stdin/stdout/stderr and
    /// blocks until it exits, returning its exit code.
    fn spawn_foreground(&self, program: &OsStr, args: &[&OsStr]) -> io::Result<i32>;
}

#[derive(Debug, Clone, Default)]
pub struct OsFileSystem {
    base: Option<PathBuf>,
}

impl OsFileSystem {
    /// Creates temp directories under `base` instead of the system temp dir.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        Self { base: Some(base.into()) }
    }
}

impl FileSystem for OsFileSystem {
    fn create_temp_dir(&self, prefix: &str) -> io::Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.base {
            Some(base) => builder.tempdir_in(base)?,
            None => builder.tempdir()?,
        };
        // removal is owned by the session from here on
        Ok(dir.keep())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironment;

impl Environment for OsEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn lookup_executable(&self, name: &str) -> bool {
        match which::which(name) {
            Ok(path) => {
                debug!(name, path = %path.display(), "executable found on PATH");
                true
            }
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessRunner;

impl ProcessRunner for OsProcessRunner {
    fn spawn_foreground(&self, program: &OsStr, args: &[&OsStr]) -> io::Result<i32> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(exit_code(status))
    }
}

/// Numeric code for `status`; a signal `n` maps to `128 + n` like a shell does.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_temp_dirs_are_unique() {
        let root = TempDir::new().unwrap();
        let fs = OsFileSystem::in_dir(root.path());

        let first = fs.create_temp_dir("edit-").unwrap();
        let second = fs.create_temp_dir("edit-").unwrap();
        assert_ne!(first, second);
        assert!(first.is_dir() && second.is_dir());
        assert!(first.starts_with(root.path()));
        assert!(first.file_name().unwrap().to_string_lossy().starts_with("edit-"));

        root.close().unwrap();
    }

    #[test]
    fn test_temp_dir_survives_until_removed() {
        let root = TempDir::new().unwrap();
        let fs = OsFileSystem::in_dir(root.path());

        let dir = fs.create_temp_dir("edit-").unwrap();
        let file = dir.join("note.txt");
        fs.write_file(&file, b"hello\n").unwrap();
        assert_eq!(fs.read_file(&file).unwrap(), b"hello\n");

        fs.remove_dir_all(&dir).unwrap();
        assert!(!dir.exists());
        assert!(fs.read_file(&file).is_err());

        root.close().unwrap();
    }

    #[test]
    fn test_missing_executable_is_not_found() {
        assert!(!OsEnvironment.lookup_executable("definitely-not-an-editor-3f9a1c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_from_status() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        // SIGKILL
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_foreground_reports_exit_code() {
        let runner = OsProcessRunner;
        let code = runner
            .spawn_foreground(OsStr::new("sh"), &[OsStr::new("-c"), OsStr::new("exit 4")])
            .unwrap();
        assert_eq!(code, 4);
    }

    #[test]
    fn test_spawn_missing_program_fails() {
        let runner = OsProcessRunner;
        let result = runner.spawn_foreground(OsStr::new("definitely-not-an-editor-3f9a1c"), &[]);
        assert!(result.is_err());
    }
}

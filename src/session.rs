use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::editor::{DEFAULT_FALLBACK_EDITOR, Invocation, LineOffset, resolve_editor};
use crate::error::{EditError, Result};
use crate::system::{
    Environment, FileSystem, OsEnvironment, OsFileSystem, OsProcessRunner, ProcessRunner,
};

pub const TEMP_DIR_PREFIX: &str = "interactive-edit-";
pub const UNTITLED: &str = "untitled";

/// One document handed to the user's editor.
///
/// Configure it with the setters, then call
/// [`edit_interactively`](Self::edit_interactively). The stored content only
/// changes when an edit completes successfully.
pub struct InteractiveEditSession {
    content: String,
    name: String,
    line_offset: LineOffset,
    fallback_editor_command: String,

    fs: Box<dyn FileSystem>,
    env: Box<dyn Environment>,
    runner: Box<dyn ProcessRunner>,
}

impl fmt::Debug for InteractiveEditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveEditSession")
            .field("content", &self.content)
            .field("name", &self.name)
            .field("line_offset", &self.line_offset)
            .field("fallback_editor_command", &self.fallback_editor_command)
            .finish_non_exhaustive()
    }
}

impl InteractiveEditSession {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: String::new(),
            line_offset: LineOffset::default(),
            fallback_editor_command: DEFAULT_FALLBACK_EDITOR.to_string(),
            fs: Box::new(OsFileSystem::default()),
            env: Box::new(OsEnvironment),
            runner: Box::new(OsProcessRunner),
        }
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_process_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Keeps only `[A-Za-z0-9._-]` so the name is always a plain file name.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = sanitize_name(name);
        self
    }

    pub fn name(&self) -> &str {
        match self.name.as_str() {
            "" | "." | ".." => UNTITLED,
            name => name,
        }
    }

    pub fn set_line_offset(&mut self, offset: impl Into<LineOffset>) -> &mut Self {
        self.line_offset = offset.into();
        self
    }

    /// Like [`set_line_offset`](Self::set_line_offset) for numeric strings
    /// such as `"12"` or `" -3 "`.
    pub fn try_set_line_offset(&mut self, offset: &str) -> Result<&mut Self> {
        self.line_offset = LineOffset::try_from(offset)?;
        Ok(self)
    }

    pub fn line_offset(&self) -> i64 {
        self.line_offset.get()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn set_fallback_editor_command(&mut self, command: impl Into<String>) -> &mut Self {
        self.fallback_editor_command = command.into();
        self
    }

    pub fn fallback_editor_command(&self) -> &str {
        &self.fallback_editor_command
    }

    /// Looked up again on every call, so environment changes are honored.
    pub fn resolve_editor_command(&self) -> String {
        resolve_editor(self.env.as_ref(), &self.fallback_editor_command)
    }

    /// Opens the content in the user's editor and blocks until it exits.
    ///
    /// On success the edited text replaces the stored content and is
    /// returned. A non-zero exit yields [`EditError::EditorExit`]; a document
    /// saved as non-UTF-8 yields [`EditError::InvalidUtf8`] carrying the raw
    /// bytes. Either way the temporary directory is gone by the time this
    /// returns.
    pub fn edit_interactively(&mut self) -> Result<&str> {
        let edited = self.run_editor()?;
        self.content = edited;
        Ok(&self.content)
    }

    fn run_editor(&self) -> Result<String> {
        let dir = self
            .fs
            .create_temp_dir(TEMP_DIR_PREFIX)
            .map_err(|e| EditError::io("failed to create temporary directory", e))?;
        let temp_dir = TempDirGuard { fs: self.fs.as_ref(), path: dir };

        let path = temp_dir.path().join(self.name());
        self.fs
            .write_file(&path, self.content.as_bytes())
            .map_err(|e| EditError::io(format!("failed to write `{}`", path.display()), e))?;

        let editor = self.resolve_editor_command();
        let invocation = Invocation::build(&editor, self.line_offset, &path)?;
        info!(editor = %editor, args = ?invocation.args, "launching editor");

        let code = self
            .runner
            .spawn_foreground(&invocation.program, &invocation.arg_refs())
            .map_err(|e| EditError::io(format!("failed to launch editor `{editor}`"), e))?;
        if code != 0 {
            info!(editor = %editor, code, "editor exited with failure");
            return Err(EditError::EditorExit { editor, code });
        }

        let bytes = self
            .fs
            .read_file(&path)
            .map_err(|e| EditError::io(format!("failed to read `{}`", path.display()), e))?;
        String::from_utf8(bytes).map_err(|e| EditError::InvalidUtf8 {
            source: e.utf8_error(),
            bytes: e.into_bytes(),
        })
    }
}

/// Shorthand for a default session: edit `content` once and return the result.
pub fn edit(content: impl Into<String>) -> Result<String> {
    let mut session = InteractiveEditSession::new(content);
    session.edit_interactively()?;
    Ok(session.into_content())
}

fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')).collect()
}

/// Removes the temporary directory when dropped, whichever way the edit ends.
struct TempDirGuard<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl TempDirGuard<'_> {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard<'_> {
    fn drop(&mut self) {
        match self.fs.remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "temporary directory removed"),
            Err(e) => {
                let path = self.path.display();
                warn!(error = ?e, %path, "failed to remove temporary directory")
            }
        }
    }
}

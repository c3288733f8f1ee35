use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{EditError, Result};
use crate::system::Environment;

pub const EDITOR_VAR: &str = "EDITOR";
/// Debian-style alternatives name for the system's default editor.
pub const SYSTEM_EDITOR: &str = "editor";
pub const DEFAULT_FALLBACK_EDITOR: &str = "vi";

/// Picks the editor command: `$EDITOR`, then `editor` if it is on the PATH,
/// then `fallback`. An `$EDITOR` holding only whitespace counts as unset.
pub fn resolve_editor(env: &dyn Environment, fallback: &str) -> String {
    if let Some(editor) = env.var(EDITOR_VAR)
        && !editor.trim().is_empty()
    {
        debug!(%editor, "editor resolved from $EDITOR");
        return editor;
    }

    if env.lookup_executable(SYSTEM_EDITOR) {
        debug!("editor resolved from PATH");
        return SYSTEM_EDITOR.to_string();
    }

    debug!(editor = fallback, "editor resolved from fallback");
    fallback.to_string()
}

/// Cursor line handed to the editor. Negative values are passed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineOffset(pub i64);

impl LineOffset {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LineOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! line_offset_from {
    ($($t:ty),*) => {
        $(impl From<$t> for LineOffset {
            fn from(value: $t) -> Self {
                LineOffset(i64::from(value))
            }
        })*
    };
}

line_offset_from!(i8, i16, i32, i64, u8, u16, u32);

impl FromStr for LineOffset {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(LineOffset)
            .map_err(|source| EditError::InvalidLineOffset { input: s.to_string(), source })
    }
}

impl TryFrom<&str> for LineOffset {
    type Error = EditError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

/// An editor-specific way of saying "open `path` at line `offset`".
pub struct EditorConvention {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    args: fn(LineOffset, &Path) -> Vec<OsString>,
}

impl fmt::Debug for EditorConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorConvention").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Checked in order; the last entry matches everything.
pub static CONVENTIONS: &[EditorConvention] = &[
    // TextMate's CLI takes `-l <line>` instead of `+<line>`
    EditorConvention {
        name: "textmate",
        matches: |program| program.starts_with("mate"),
        args: |offset, path| {
            let offset = OsString::from(offset.to_string());
            vec![OsString::from("-l"), offset, path.as_os_str().to_owned()]
        },
    },
    EditorConvention {
        name: "plus-line",
        matches: |_| true,
        args: |offset, path| {
            vec![OsString::from(format!("+{offset}")), path.as_os_str().to_owned()]
        },
    },
];

/// Finds the convention for `program`, matching on its file name so that an
/// absolute path to the editor behaves like the bare name.
pub fn convention_for(program: &str) -> &'static EditorConvention {
    let file_name = Path::new(program).file_name().and_then(OsStr::to_str).unwrap_or(program);
    CONVENTIONS
        .iter()
        .find(|c| (c.matches)(file_name))
        .unwrap_or(&CONVENTIONS[CONVENTIONS.len() - 1])
}

/// A fully built argument vector, never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Splits `command` into words (so `EDITOR="code --wait"` works) and
    /// appends the convention's arguments for `offset` and `path`.
    pub fn build(command: &str, offset: LineOffset, path: &Path) -> Result<Self> {
        let words = shlex::split(command)
            .ok_or_else(|| EditError::InvalidEditorCommand(command.to_string()))?;
        let (program, extra) = words
            .split_first()
            .ok_or_else(|| EditError::InvalidEditorCommand(command.to_string()))?;

        let convention = convention_for(program);
        debug!(%program, convention = convention.name, "editor convention selected");

        let mut args: Vec<OsString> = extra.iter().map(OsString::from).collect();
        args.extend((convention.args)(offset, path));
        Ok(Self { program: program.into(), args })
    }

    pub fn arg_refs(&self) -> Vec<&OsStr> {
        self.args.iter().map(OsString::as_os_str).collect()
    }
}

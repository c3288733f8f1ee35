use std::path::PathBuf;

use clap::{Parser, ValueHint};
use interactive_edit::LineOffset;

/// Edit a file, or an empty buffer, in your preferred editor.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// File providing the initial content (empty document when omitted)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Name of the temporary file handed to the editor (defaults to FILE's name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Line the editor opens at
    #[arg(short, long, allow_hyphen_values = true)]
    pub line: Option<LineOffset>,

    /// Editor used when $EDITOR is unset and no `editor` is on the PATH
    #[arg(long, value_name = "COMMAND")]
    pub fallback_editor: Option<String>,

    /// Write the result back to FILE instead of printing it
    #[arg(short, long, requires = "file")]
    pub write: bool,

    /// Path to config file
    #[arg(short, long, env = "INTERACTIVE_EDIT_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_args_debug_assert() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_line_string() {
        let args = Args::try_parse_from(["interactive-edit", "-l", "12", "notes.txt"]).unwrap();
        assert_eq!(args.line, Some(LineOffset(12)));
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert!(!args.write);

        let args = Args::try_parse_from(["interactive-edit", "--line", "-2"]).unwrap();
        assert_eq!(args.line, Some(LineOffset(-2)));

        assert!(Args::try_parse_from(["interactive-edit", "-l", "top"]).is_err());
    }

    #[test]
    fn test_write_requires_file() {
        assert!(Args::try_parse_from(["interactive-edit", "-w"]).is_err());
        let args = Args::try_parse_from(["interactive-edit", "-w", "a.txt"]).unwrap();
        assert!(args.write);
    }
}

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use interactive_edit::{EditError, InteractiveEditSession};
use tracing::{error, info, warn};

mod cli;
mod config;
mod logging;
mod panic;

fn main() -> Result<ExitCode> {
    panic::init()?;

    let args = cli::Args::parse();
    let config = config::Config::new(args.config.clone())?;
    logging::init(&config)?;

    let content = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Fail to read file `{}`", path.display()))?,
        None => String::new(),
    };

    let mut session = InteractiveEditSession::new(content);
    if let Some(name) = args.name.as_deref().or_else(|| file_name(&args)) {
        session.set_name(name);
    }
    if let Some(line) = args.line.or(config.line_offset.map(Into::into)) {
        session.set_line_offset(line);
    }
    if let Some(fallback) = args.fallback_editor.as_ref().or(config.fallback_editor.as_ref()) {
        session.set_fallback_editor_command(fallback.as_str());
    }

    let edited = match session.edit_interactively() {
        Ok(edited) => edited.as_bytes().to_vec(),
        // the edit is still the user's work, so keep it verbatim
        Err(EditError::InvalidUtf8 { bytes, source }) => {
            warn!(error = %source, "edited document is not valid UTF-8");
            eprintln!("warning: edited document is not valid UTF-8, keeping raw bytes");
            bytes
        }
        Err(EditError::EditorExit { editor, code }) => {
            info!(%editor, code, "edit cancelled");
            eprintln!("edit cancelled: `{editor}` exited with status {code}");
            return Ok(ExitCode::from(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)));
        }
        Err(e) => {
            error!(error = ?e, "edit failed");
            return Err(e.into());
        }
    };

    match (&args.file, args.write) {
        (Some(path), true) => fs::write(path, edited)
            .with_context(|| format!("Fail to write file `{}`", path.display()))?,
        _ => io::stdout().lock().write_all(&edited)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn file_name(args: &cli::Args) -> Option<&str> {
    args.file.as_deref()?.file_name()?.to_str()
}

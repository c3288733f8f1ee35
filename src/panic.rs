use std::panic::PanicHookInfo;

use anyhow::Result;
use tracing::error;

/// Logs the panic, reports it on stderr and exits with `EXIT_FAILURE`.
pub fn init() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = strip_ansi_escapes::strip_str(panic_info.to_string());
        error!(panic = %msg, "interactive-edit panicked");

        report(panic_info);
        std::process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}

#[cfg(not(debug_assertions))]
fn report(panic_info: &PanicHookInfo<'_>) {
    use human_panic::{handle_dump, metadata, print_msg};

    let metadata = metadata!();
    let file_path = handle_dump(&metadata, panic_info);
    if let Err(e) = print_msg(file_path, &metadata) {
        eprintln!("human-panic: printing error message to console failed: {e}");
    }
    eprintln!("{}", panic_info);
    eprintln!("\nThis is a bug. Consider reporting it at {}", env!("CARGO_PKG_REPOSITORY"));
}

#[cfg(debug_assertions)]
fn report(panic_info: &PanicHookInfo<'_>) {
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(panic_info);
}

//! Hand a document to the user's external editor and get the edited text back.
//!
//! ```no_run
//! use interactive_edit::InteractiveEditSession;
//!
//! let mut session = InteractiveEditSession::new("Subject\n\nBody\n");
//! session.set_name("COMMIT_EDITMSG").set_line_offset(1);
//! match session.edit_interactively() {
//!     Ok(message) => println!("{message}"),
//!     Err(e) if e.is_cancelled() => eprintln!("edit cancelled"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod editor;
pub mod error;
pub mod session;
pub mod system;

pub use editor::{Invocation, LineOffset};
pub use error::{EditError, Result};
pub use session::{InteractiveEditSession, edit};

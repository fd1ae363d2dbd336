// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod editor;
pub mod error;
pub mod id;
pub mod report;
pub mod runtime;
pub mod scoring;
pub mod store;
pub mod ui;
pub mod util;

pub use editor::{SessionEditor, SetDirection};
pub use error::{QuiverError, Result};
pub use scoring::{ArrowScore, Session, SessionConfig};

//! The operation layer for deckdoc documents.
//!
//! Every request is a `module.operation` name plus a bag of JSON parameters.
//! Dispatch resolves the name to a closed per-module operation enum, loads
//! the target document through the persistence gateway, hands it to exactly
//! one handler, and saves only when the handler reports a mutation. A report
//! (status line or JSON payload) comes back on success; a typed error with a
//! stable exit code comes back on failure.

pub mod address;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod report;

mod document;
mod headerfooter;
mod hyperlinks;
mod notes;
mod properties;
mod protection;
mod revisions;
mod sections;
mod shapes;
mod slides;
mod tables;
mod text;
mod watermark;

pub use dispatch::{dispatch, run_request, MODULES};
pub use error::{ErrorKind, ExitCode, OpError, OpResult};
pub use report::Report;

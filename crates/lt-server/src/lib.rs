//! Log Triage HTTP front end.
//!
//! A small synchronous server over the artifact store:
//! - `/report-data` and `/report-generate` JSON routes
//! - the browse index page at `/`
//! - static assets and template-rendered `.html` pages from the public
//!   directory, with a custom 404 page
//!
//! The accept loop runs on a background thread with an atomic shutdown
//! flag, so embedding the server (and testing it over real sockets) is
//! cheap.

pub mod error;
pub mod router;
pub mod server;

pub use error::ServerError;
pub use router::{App, HttpReply};
pub use server::ReporterServer;

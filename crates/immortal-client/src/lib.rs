//! immortal-client - Authenticated HTTP client for the Immortal API.
//!
//! Wraps every request to the backing service: bearer-token injection,
//! JSON and multipart bodies, and silent recovery from expired access
//! tokens via a single-flight refresh coordinated across concurrent
//! requests.

mod endpoints;
mod http;
mod refresh;
mod session;

pub use http::{ApiClient, FilePart};
pub use session::{ApiSession, SessionState};

//! Axum extractors for request handling
//!
//! Custom extractors for the browser session, validation, confirmation, and
//! path/query parsing.

mod confirm;
mod path;
mod query;
mod session;
mod validated;

pub use confirm::Confirmed;
pub use path::EventIdPath;
pub use query::ListQuery;
pub use session::{CurrentSession, SignedIn};
pub use validated::ValidatedJson;

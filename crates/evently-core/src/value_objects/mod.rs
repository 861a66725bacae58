//! Value objects - immutable domain primitives

mod caller;
mod event_status;
mod session_key;

pub use caller::Caller;
pub use event_status::{EventStatus, ParseEventStatusError};
pub use session_key::SessionKey;

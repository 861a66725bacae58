//! Browser session management
//!
//! Each browser is identified by an opaque [`SessionKey`](evently_core::SessionKey)
//! and gets its own [`SessionManager`], owned by the [`SessionRegistry`].

mod in_flight;
mod manager;
mod registry;
mod route;
mod subscription;

pub use in_flight::ActionGuard;
pub use manager::{SessionManager, SessionSnapshot};
pub use registry::SessionRegistry;
pub use route::Route;
pub use subscription::{SessionNotice, Subscription};

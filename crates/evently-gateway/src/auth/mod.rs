//! Auth provider implementations

mod gotrue;

pub use gotrue::GoTrueClient;

//! Navigation targets returned by session and page actions

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A page the browser should navigate to after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    ResetPassword,
    Dashboard,
    MyEvents,
    Attending,
    Profile,
    Event(Uuid),
    EditEvent(Uuid),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::ResetPassword => "/reset-password".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::MyEvents => "/dashboard/my-events".to_string(),
            Self::Attending => "/dashboard/attending".to_string(),
            Self::Profile => "/dashboard/profile".to_string(),
            Self::Event(id) => format!("/dashboard/events/{id}"),
            Self::EditEvent(id) => format!("/dashboard/events/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

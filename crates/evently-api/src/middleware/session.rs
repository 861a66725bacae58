//! Session cookie layer
//!
//! Every request gets a [`SessionKey`] in its extensions. Browsers without a
//! valid cookie are issued a fresh key on the way out.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use evently_common::SessionConfig;
use evently_core::SessionKey;
use tracing::debug;

/// Cookie attributes for the session key
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
}

impl From<&SessionConfig> for SessionCookie {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
        }
    }
}

impl SessionCookie {
    fn build(&self, key: &SessionKey) -> Cookie<'static> {
        Cookie::build((self.name.clone(), key.as_str().to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .permanent()
            .build()
    }
}

/// Attach the browser's session key, issuing one if needed
pub async fn session_cookie(
    State(cookie): State<SessionCookie>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(&cookie.name)
        .and_then(|c| SessionKey::parse(c.value()));

    let (key, issued) = match existing {
        Some(key) => (key, false),
        None => (SessionKey::generate(), true),
    };

    request.extensions_mut().insert(key.clone());
    let response = next.run(request).await;

    if issued {
        debug!(session = %key, "Issued session cookie");
        (jar.add(cookie.build(&key)), response).into_response()
    } else {
        response
    }
}

//! HTTP client for the hosted backend
//!
//! One `reqwest::Client` is shared by the data and auth APIs. Every request
//! carries the public API key; data requests are authorized with the caller's
//! access token (or the API key for anonymous callers).

mod error;
mod query;

use std::time::Duration;

use evently_common::BackendConfig;
use evently_core::{Caller, DomainError, RepoResult};
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub use error::{map_auth_error, map_rest_error, map_transport_error, AuthErrorBody, RestErrorBody};
pub use query::Query;

const RETURN_REPRESENTATION: &str = "return=representation";
const IGNORE_DUPLICATES: &str = "resolution=ignore-duplicates,return=representation";

/// Client for the hosted backend's REST and auth APIs
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    rest_url: String,
    auth_url: String,
    anon_key: String,
}

impl RestClient {
    /// Create a client from backend configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &BackendConfig) -> RepoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DomainError::BackendError(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            rest_url: config.rest_url(),
            auth_url: config.auth_url(),
            anon_key: config.anon_key.clone(),
        })
    }

    // ========================================================================
    // Data API
    // ========================================================================

    fn rest_request(&self, method: Method, caller: &Caller, query: &Query) -> RequestBuilder {
        let bearer = caller.access_token().unwrap_or(&self.anon_key);
        self.http
            .request(method, format!("{}/{}", self.rest_url, query.table_name()))
            .query(&query.params())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// `GET` rows matching a query
    pub async fn select<T: DeserializeOwned>(
        &self,
        caller: &Caller,
        query: &Query,
    ) -> RepoResult<Vec<T>> {
        debug!(table = query.table_name(), "REST select");
        let request = self.rest_request(Method::GET, caller, query);
        self.execute_rest(request).await
    }

    /// `POST` rows, returning the stored representation
    ///
    /// When the query carries a conflict target, duplicates are ignored and
    /// omitted from the returned rows.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        caller: &Caller,
        query: &Query,
        body: &B,
    ) -> RepoResult<Vec<T>> {
        debug!(table = query.table_name(), upsert = query.is_upsert(), "REST insert");
        let prefer = if query.is_upsert() {
            IGNORE_DUPLICATES
        } else {
            RETURN_REPRESENTATION
        };
        let request = self
            .rest_request(Method::POST, caller, query)
            .header("Prefer", prefer)
            .json(body);
        self.execute_rest(request).await
    }

    /// `PATCH` rows matching a query, returning the updated rows
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        caller: &Caller,
        query: &Query,
        body: &B,
    ) -> RepoResult<Vec<T>> {
        debug!(table = query.table_name(), "REST update");
        let request = self
            .rest_request(Method::PATCH, caller, query)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        self.execute_rest(request).await
    }

    /// `DELETE` rows matching a query, returning the removed rows
    pub async fn delete<T: DeserializeOwned>(
        &self,
        caller: &Caller,
        query: &Query,
    ) -> RepoResult<Vec<T>> {
        debug!(table = query.table_name(), "REST delete");
        let request = self
            .rest_request(Method::DELETE, caller, query)
            .header("Prefer", RETURN_REPRESENTATION);
        self.execute_rest(request).await
    }

    async fn execute_rest<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepoResult<T> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(map_transport_error);
        }

        let body = response.json::<RestErrorBody>().await.unwrap_or_default();
        Err(map_rest_error(status, &body))
    }

    // ========================================================================
    // Auth API
    // ========================================================================

    /// Build an auth API request, optionally authorized with an access token
    pub fn auth_request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.auth_url, path))
            .header("apikey", &self.anon_key)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    /// Send an auth request and decode its JSON body
    pub async fn execute_auth<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepoResult<T> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(map_transport_error);
        }

        let body = response.json::<AuthErrorBody>().await.unwrap_or_default();
        Err(map_auth_error(status, &body))
    }

    /// Send an auth request whose success body is irrelevant
    pub async fn execute_auth_empty(&self, request: RequestBuilder) -> RepoResult<()> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() || status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.json::<AuthErrorBody>().await.unwrap_or_default();
        Err(map_auth_error(status, &body))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("rest_url", &self.rest_url)
            .field("auth_url", &self.auth_url)
            .finish_non_exhaustive()
    }
}

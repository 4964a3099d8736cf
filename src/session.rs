//! Authenticated session for endpoints that need a logged-in user
//!
//! The login handshake is two requests: a GET of the login page, which sets
//! the `csrftoken` cookie, then a form POST carrying that token and the
//! credentials. The cookie jar is shared by the session's `reqwest::Client`
//! and every transport created from the session.
//!
//! There is no re-authentication. A request made with an expired session
//! fails like any other transport error and the caller logs in again.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, build_client};
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Name of the cookie carrying the cross-site request forgery token
pub const CSRF_COOKIE: &str = "csrftoken";

/// Login credentials
#[derive(Clone)]
pub struct Credentials {
    /// Account email address
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials from an email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A logged-in API session
#[derive(Clone, Debug)]
pub struct Session {
    client: reqwest::Client,
    base_url: String,
}

impl Session {
    /// Perform the login handshake
    ///
    /// # Errors
    /// - [`Error::Transport`] / [`Error::HttpStatus`] if either request fails
    /// - [`Error::Auth`] if no CSRF cookie is issued or the login is rejected
    pub async fn login(config: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = build_client(config, Some(Arc::clone(&jar)))?;
        let login_url = config.login_url.as_str();
        let parsed_login_url = Url::parse(login_url).map_err(|e| {
            Error::config(format!("invalid URL '{login_url}': {e}"), "api.login_url")
        })?;

        debug!(url = login_url, "Fetching login page for CSRF token");
        let response = client
            .get(login_url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                target: login_url.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                target: login_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        // The cookie may have been set on any hop of a redirect chain
        let csrf_token = jar
            .cookies(&parsed_login_url)
            .and_then(|header| cookie_value(header.to_str().ok()?, CSRF_COOKIE))
            .ok_or_else(|| Error::Auth(format!("login page did not set a {CSRF_COOKIE} cookie")))?;

        let form = [
            ("csrfmiddlewaretoken", csrf_token.as_str()),
            ("login", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
            ("app", config.login_app.as_str()),
            ("redirect_uri", config.login_redirect_uri.as_str()),
        ];

        let response = client
            .post(login_url)
            .form(&form)
            .send()
            .await
            .map_err(|source| Error::Transport {
                target: login_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "login request returned HTTP {}",
                status.as_u16()
            )));
        }

        // A rejected login redirects back with state=fail in the query string
        if let Some(reason) = login_failure_reason(response.url()) {
            return Err(Error::Auth(format!("login rejected: {reason}")));
        }

        info!(email = %credentials.email, "Logged in");
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Transport that sends this session's cookies with every request
    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::with_client(self.client.clone(), &self.base_url)
    }
}

/// Find `name` in a `Cookie` header value (`a=1; b=2`)
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn login_failure_reason(url: &Url) -> Option<String> {
    let mut failed = false;
    let mut reason = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "state" if value == "fail" => failed = true,
            "reason" => reason = Some(value.into_owned()),
            _ => {}
        }
    }
    failed.then(|| reason.unwrap_or_else(|| "unknown reason".to_string()))
}

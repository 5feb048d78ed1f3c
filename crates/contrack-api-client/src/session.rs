//! Explicit user session passed to the client at construction.
//!
//! Replaces ambient token storage: whoever builds the client decides where
//! the token came from, and clearing the session is an explicit call (a 401
//! from the store is the usual trigger).

use anyhow::{Context, Result};

/// The demo token the store accepts for evaluation logins.
const DEMO_TOKEN: &str = "demo-token";

/// Bearer token plus the email the store scopes every query by.
#[derive(Clone, Debug)]
pub struct Session {
    token: String,
    email: String,
}

impl Session {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
        }
    }

    /// Demo login: any email, fixed token. Mirrors the store's evaluation
    /// auth; real deployments use [`Session::from_env`].
    pub fn demo(email: impl Into<String>) -> Self {
        Self::new(DEMO_TOKEN, email)
    }

    /// Session from `CONTRACK_USER_EMAIL` and `CONTRACK_API_TOKEN`.
    /// Falls back to the demo token when no token is set.
    pub fn from_env() -> Result<Self> {
        let email = std::env::var("CONTRACK_USER_EMAIL")
            .context("Missing user email. Set CONTRACK_USER_EMAIL")?;
        let token =
            std::env::var("CONTRACK_API_TOKEN").unwrap_or_else(|_| DEMO_TOKEN.to_string());
        Ok(Self::new(token, email))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// End the session. Call after the store rejects the token (401); the
    /// user must log in again before this session can be reused.
    pub fn clear(&mut self) {
        self.token.clear();
        self.email.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_empty() && !self.email.is_empty()
    }
}

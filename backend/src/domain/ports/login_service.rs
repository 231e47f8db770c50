//! Driving ports for account use-cases: sign-up and login.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! to create or authenticate accounts without knowing how credentials are
//! stored or hashed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupRequest, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Domain use-case port for account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Create an account and return the new user.
    async fn sign_up(&self, request: &SignupRequest) -> Result<User, Error>;
}

//! Sign-up and login backed by the user repository and a password hasher.
//!
//! Hashing and verification run on tokio's blocking pool. A login for an
//! unknown email still verifies the password against a decoy hash, so both
//! rejection paths cost one verification.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, SignupService, UserRepository,
};
use crate::domain::service_support::{map_hash_error, map_user_error};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordHash, SignupRequest, User, UserAccount,
    UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const DECOY_PASSWORD: &str = "circle-login-decoy";

/// Account service implementing the authentication driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    decoy_hash: Arc<OnceLock<PasswordHash>>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }
}

impl<U, H> AccountService<U, H>
where
    H: PasswordHasher + 'static,
{
    async fn offload<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || job(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    /// Burn one verification for a login whose email matched no account.
    async fn verify_decoy(&self, password: Zeroizing<String>) -> Result<(), Error> {
        let decoy = Arc::clone(&self.decoy_hash);
        self.offload(move |hasher| {
            let hash = match decoy.get() {
                Some(hash) => hash.clone(),
                None => {
                    let fresh = hasher.hash(DECOY_PASSWORD)?;
                    decoy.get_or_init(|| fresh).clone()
                }
            };
            hasher.verify(&password, &hash).map(drop)
        })
        .await
    }
}

#[async_trait]
impl<U, H> SignupService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn sign_up(&self, request: &SignupRequest) -> Result<User, Error> {
        let password = Zeroizing::new(request.password().to_owned());
        let password_hash = self.offload(move |hasher| hasher.hash(&password)).await?;
        let user = User::new(
            UserId::random(),
            request.username().clone(),
            request.email().clone(),
            self.clock.utc(),
        );
        let account = UserAccount {
            user,
            password_hash,
        };

        self.users.insert(&account).await.map_err(map_user_error)?;
        info!(user_id = %account.user.id(), "account created");
        Ok(account.user)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        // A malformed address cannot belong to any account.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let password = Zeroizing::new(credentials.password().to_owned());

        let Some(account) = self
            .users
            .find_account_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            self.verify_decoy(password).await?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let stored = account.password_hash.clone();
        let verified = self
            .offload(move |hasher| hasher.verify(&password, &stored))
            .await?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.user)
    }
}

//! User Account Service
//!
//! Registration, session token issue/rotation/removal, and lookups by token
//! or credentials. Every write goes through [`UserService::save`], which
//! applies the account rules and hashes a modified password first.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{SessionToken, UserAccount, ACCESS_AUTH};
use crate::error::{DocketError, Result};
use crate::repository::UserRepository;
use crate::service::password::PasswordService;
use crate::service::token::TokenService;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    passwords: Arc<PasswordService>,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        passwords: Arc<PasswordService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self { repo, passwords, tokens }
    }

    /// Create and store a new account
    pub async fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<UserAccount> {
        let mut account = UserAccount::new(username, email, password);
        self.save(&mut account).await?;
        info!(user_id = %account.id, "User account registered");
        Ok(account)
    }

    /// Persist `account`.
    ///
    /// Identity rules are checked on every write. A password changed since
    /// load is checked against the policy and replaced by its hash before the
    /// write; an unchanged password is written back as-is. `account` is only
    /// updated once the write succeeds.
    pub async fn save(&self, account: &mut UserAccount) -> Result<()> {
        account.check_identity()?;

        if let Some(plain) = account.pending_password() {
            self.passwords.policy().validate(plain)?;
            let hash = self.passwords.hash_password(plain)?;

            let mut hashed = account.clone();
            hashed.commit_password_hash(hash);
            self.repo.save(&hashed).await?;
            *account = hashed;
            debug!(user_id = %account.id, "Password hashed");
            return Ok(());
        }

        if account.password_hash().is_empty() {
            return Err(DocketError::validation("password is required"));
        }
        self.repo.save(account).await
    }

    /// Issue a new session token, rotating out the oldest when both slots are taken.
    ///
    /// On error `account` keeps its previous token list.
    pub async fn generate_auth_token(&self, account: &mut UserAccount) -> Result<String> {
        let token = self.tokens.sign(&account.id)?;

        let mut updated = account.clone();
        let evicted = updated.tokens.issue(SessionToken::auth(token.clone()));
        self.save(&mut updated).await?;
        *account = updated;

        info!(
            user_id = %account.id,
            sessions = account.tokens.len(),
            rotated = evicted.len(),
            "Session token issued"
        );
        Ok(token)
    }

    /// Remove one session token. Unknown tokens are ignored.
    pub async fn remove_token(&self, account: &mut UserAccount, token: &str) -> Result<()> {
        self.repo.pull_token(&account.id, token).await?;
        if account.tokens.remove(token) {
            info!(user_id = %account.id, "Session token removed");
        }
        Ok(())
    }

    /// Resolve the account owning a live session token.
    ///
    /// The signature is checked before storage is consulted.
    pub async fn find_by_token(&self, token: &str) -> Result<UserAccount> {
        let claims = self.tokens.verify(token).map_err(|e| {
            warn!(error = %e, "Session token rejected");
            e
        })?;

        self.repo
            .find_by_token(&claims.account_id, token, ACCESS_AUTH)
            .await?
            .ok_or_else(|| DocketError::not_found("UserAccount", format!("session of {}", claims.account_id)))
    }

    /// Resolve the account for an email/password pair
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Result<UserAccount> {
        let email = email.trim();
        let account = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DocketError::not_found("UserAccount", email))?;

        if self.passwords.verify_password(password, account.password_hash())? {
            Ok(account)
        } else {
            warn!(user_id = %account.id, "Password mismatch");
            Err(DocketError::Credential)
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<UserAccount> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DocketError::not_found("UserAccount", id))
    }
}

//! User Account Entity
//!
//! An authenticated principal with a hashed password and at most
//! [`MAX_SESSION_TOKENS`] live session tokens.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use subtle::ConstantTimeEq;

use crate::error::{DocketError, Result};

/// Access kind carried by login session tokens
pub const ACCESS_AUTH: &str = "auth";

/// Session slots per account
pub const MAX_SESSION_TOKENS: usize = 2;

/// One issued session token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access: String,
    pub token: String,
}

impl SessionToken {
    pub fn new(access: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            token: token.into(),
        }
    }

    /// Login session token
    pub fn auth(token: impl Into<String>) -> Self {
        Self::new(ACCESS_AUTH, token)
    }

    fn matches(&self, token: &str) -> bool {
        self.token.as_bytes().ct_eq(token.as_bytes()).into()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("access", &self.access)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Bounded, ordered list of session tokens, oldest first.
///
/// Issuing into a full list evicts the oldest entry, so the newest
/// [`MAX_SESSION_TOKENS`] sessions stay valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTokens(Vec<SessionToken>);

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`, returning whatever had to be evicted to make room.
    pub fn issue(&mut self, entry: SessionToken) -> Vec<SessionToken> {
        let mut evicted = Vec::new();
        while self.0.len() >= MAX_SESSION_TOKENS {
            evicted.push(self.0.remove(0));
        }
        self.0.push(entry);
        evicted
    }

    /// Drop every entry carrying `token`. Returns whether anything was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| !t.matches(token));
        self.0.len() != before
    }

    pub fn contains(&self, token: &str, access: &str) -> bool {
        self.0.iter().any(|t| t.access == access && t.matches(token))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionToken> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SessionToken] {
        &self.0
    }
}

/// User account document
#[derive(Clone, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique, trimmed, non-empty
    pub username: String,

    /// Unique, trimmed, valid address
    pub email: String,

    /// Salted one-way hash; never plaintext once saved
    #[serde(rename = "password")]
    password_hash: String,

    #[serde(default)]
    pub tokens: SessionTokens,

    /// Plaintext set since load, hashed by the save hook
    #[serde(skip)]
    pending_password: Option<String>,
}

impl UserAccount {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::domain::new_object_id(),
            username: username.into().trim().to_string(),
            email: email.into().trim().to_string(),
            password_hash: String::new(),
            tokens: SessionTokens::new(),
            pending_password: Some(password.into()),
        }
    }

    /// Replace the password. Takes effect on the next save.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.pending_password = Some(password.into());
    }

    pub fn is_password_modified(&self) -> bool {
        self.pending_password.is_some()
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub(crate) fn pending_password(&self) -> Option<&str> {
        self.pending_password.as_deref()
    }

    /// Swap the pending plaintext for its hash
    pub(crate) fn commit_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
        self.pending_password = None;
    }

    /// Username and email rules enforced at write time
    pub fn check_identity(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(DocketError::validation("username is required"));
        }
        if !is_valid_email(&self.email) {
            return Err(DocketError::validation(format!("{} is not a valid email", self.email)));
        }
        Ok(())
    }

    /// The only fields ever returned to clients
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("tokens", &self.tokens.len())
            .field("password_modified", &self.is_password_modified())
            .finish()
    }
}

/// Client-facing projection of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        let atom = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+";
        let pattern = format!(
            r"^{atom}(?:\.{atom})*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{{0,61}}[A-Za-z0-9])?\.)+[A-Za-z]{{2,63}}$"
        );
        Regex::new(&pattern).expect("email pattern is valid")
    })
}

/// Address syntax check: dot-atom local part (non-ASCII letters allowed),
/// ASCII hostname labels, alphabetic TLD.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    match email.split_once('@') {
        Some((local, _)) if local.len() > 64 => false,
        Some(_) => email_regex().is_match(email),
        None => false,
    }
}

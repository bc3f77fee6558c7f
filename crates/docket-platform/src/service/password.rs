//! Password Service
//!
//! Strength policy plus Argon2id hashing. Verification goes through the
//! argon2 crate, which compares digests in constant time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DocketError, Result};

/// Password strength rules applied before a password is hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub allow_whitespace: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 100,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            allow_whitespace: false,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> Result<()> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(DocketError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        if length > self.max_length {
            return Err(DocketError::validation(format!(
                "Password must be at most {} characters",
                self.max_length
            )));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(DocketError::validation("Password must contain at least one uppercase letter (A-Z)"));
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(DocketError::validation("Password must contain at least one lowercase letter (a-z)"));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(DocketError::validation("Password must contain at least one digit"));
        }
        if !self.allow_whitespace && password.chars().any(char::is_whitespace) {
            return Err(DocketError::validation("Password must not contain spaces"));
        }
        Ok(())
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Config {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

pub struct PasswordService {
    policy: PasswordPolicy,
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(policy: PasswordPolicy, config: Argon2Config) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DocketError::configuration(format!("invalid argon2 parameters: {}", e)))?;

        Ok(Self {
            policy,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Salted PHC-format hash of `password`
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DocketError::configuration(format!("password hashing failed: {}", e)))
    }

    /// Check `password` against a stored hash. Cost parameters come from the hash itself.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|_| DocketError::Credential)?;
        Ok(self.argon2.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self {
            policy: PasswordPolicy::default(),
            argon2: Argon2::default(),
        }
    }
}

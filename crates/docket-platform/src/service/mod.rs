//! Service Layer
//!
//! Docket façade plus the account services: password hashing, token signing
//! and the user account operations built on them.

pub mod docket;
pub mod password;
pub mod token;
pub mod user;

pub use docket::DocketService;
pub use password::{Argon2Config, PasswordPolicy, PasswordService};
pub use token::{SessionClaims, TokenConfig, TokenService};
pub use user::UserService;

//! Authentication module.

pub mod identity;
pub mod password;
pub mod token;

pub use identity::AuthUser;
pub use password::{hash_password, hash_password_secure, verify_password, MIN_PASSWORD_LENGTH};
pub use token::{issue_token, validate_token, Claims, TOKEN_TTL_SECS};

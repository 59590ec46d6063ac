use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, PlainPassword},
};

/// Service for hashing and verifying passwords
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password
    fn hash(&self, plain_password: &PlainPassword) -> Result<HashedPassword, DomainError>;

    /// Verify a plain text password against a hashed password
    fn verify(
        &self,
        plain_password: &PlainPassword,
        hashed_password: &HashedPassword,
    ) -> Result<bool, DomainError>;
}

use argon2::{
    Argon2, PasswordHash as Argon2Hash,
    password_hash::{PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, PlainPassword},
    services::password_service::PasswordHasher,
};

/// Argon2id with default parameters and a fresh random salt per hash
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &PlainPassword) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plain_password.expose().as_bytes(), &salt)
            .map_err(|e| DomainError::PasswordHashing(e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(
        &self,
        plain_password: &PlainPassword,
        hashed_password: &HashedPassword,
    ) -> Result<bool, DomainError> {
        let parsed_hash = Argon2Hash::new(hashed_password.as_str())
            .map_err(|e| DomainError::PasswordHashing(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(plain_password.expose().as_bytes(), &parsed_hash)
            .is_ok())
    }
}

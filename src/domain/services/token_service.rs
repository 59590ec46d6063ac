use crate::domain::{
    error::DomainError,
    models::account::{Account, NfcToken},
};

pub type Token = String;

/// Issues session tokens for authenticated accounts
pub trait TokenGenerator: Send + Sync {
    fn generate(&self, account: &Account) -> Result<Token, DomainError>;
}

/// Mints the identifier token stored on every new account
pub trait NfcTokenGenerator: Send + Sync {
    fn generate(&self) -> Result<NfcToken, DomainError>;
}

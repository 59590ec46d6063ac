use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Missing required field")]
    MissingField,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("Account already registered")]
    DuplicateAccount,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("NFC token is not bound to any account")]
    UnknownNfcToken,

    #[error("NFC token already bound to another account")]
    NfcTokenInUse,

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("NFC token already exists: {0}")]
    DuplicateNfcToken(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

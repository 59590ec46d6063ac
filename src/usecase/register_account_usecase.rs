use crate::domain::{
    error::{DomainError, RepositoryError},
    models::account::{Account, NfcToken, RegistrationForm},
    repositories::account_repository::AccountRepository,
    services::{password_service::PasswordHasher, token_service::NfcTokenGenerator},
};

#[derive(Debug)]
pub struct RegistrationResult {
    pub account: Account,
    pub nfc_token: NfcToken,
}

pub struct RegisterAccountUsecase<R: AccountRepository, P: PasswordHasher, N: NfcTokenGenerator> {
    account_repository: R,
    password_hasher: P,
    token_generator: N,
}

impl<R: AccountRepository, P: PasswordHasher, N: NfcTokenGenerator> RegisterAccountUsecase<R, P, N> {
    pub fn new(account_repository: R, password_hasher: P, token_generator: N) -> Self {
        Self {
            account_repository,
            password_hasher,
            token_generator,
        }
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<RegistrationResult, DomainError> {
        let registration = form.validate()?;
        let email = registration.profile().email().clone();

        if self.account_repository.find_by_email(&email).await?.is_some() {
            tracing::info!(email = email.as_str(), "registration rejected: email already registered");
            return Err(DomainError::DuplicateAccount);
        }

        let password_hash = self.password_hasher.hash(registration.password())?;
        let nfc_token = self.token_generator.generate()?;
        let role = registration.role();

        // The store's unique index settles races the lookup above cannot see.
        let account = self
            .account_repository
            .save(registration.prepare(password_hash, nfc_token.clone()))
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateEmail(_) => DomainError::DuplicateAccount,
                other => DomainError::Repository(other),
            })?;

        tracing::info!(
            account_id = %account.id().as_uuid(),
            email = email.as_str(),
            role = %role,
            "account registered"
        );

        Ok(RegistrationResult { account, nfc_token })
    }
}

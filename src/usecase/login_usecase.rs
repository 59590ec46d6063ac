use crate::domain::{
    error::DomainError,
    models::{
        account::{Account, Email},
        credential::PlainPassword,
    },
    repositories::account_repository::AccountRepository,
    services::{password_service::PasswordHasher, token_service::TokenGenerator},
};

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub account: Account,
}

pub struct LoginUsecase<R: AccountRepository, P: PasswordHasher, T: TokenGenerator> {
    account_repository: R,
    password_hasher: P,
    token_generator: T,
}

impl<R: AccountRepository, P: PasswordHasher, T: TokenGenerator> LoginUsecase<R, P, T> {
    pub fn new(account_repository: R, password_hasher: P, token_generator: T) -> Self {
        Self {
            account_repository,
            password_hasher,
            token_generator,
        }
    }

    /// Unknown email and wrong password fail the same way
    pub async fn login(&self, email: &str, password: PlainPassword) -> Result<LoginResult, DomainError> {
        let email = Email::parse(email).map_err(|_| DomainError::AuthenticationFailed)?;

        let account = self
            .account_repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::AuthenticationFailed)?;

        if !self.password_hasher.verify(&password, account.password_hash())? {
            tracing::info!(email = email.as_str(), "login rejected: wrong password");
            return Err(DomainError::AuthenticationFailed);
        }

        let token = self.token_generator.generate(&account)?;

        Ok(LoginResult { token, account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::jwt_token_generator::JwtTokenGenerator,
        test_support::{CountingPasswordHasher, InMemoryAccountRepository, sample_account},
    };

    fn usecase(
        repository: InMemoryAccountRepository,
    ) -> LoginUsecase<InMemoryAccountRepository, CountingPasswordHasher, JwtTokenGenerator> {
        LoginUsecase::new(
            repository,
            CountingPasswordHasher::default(),
            JwtTokenGenerator::with_expiration("secret".to_string(), 1),
        )
    }

    #[tokio::test]
    async fn login_with_right_password_issues_token() {
        let repository = InMemoryAccountRepository::with_accounts([sample_account("ana@x.com")]);

        let result = usecase(repository)
            .login("Ana@X.com", PlainPassword::new("pw".to_string()))
            .await
            .unwrap();

        assert!(!result.token.is_empty());
        assert_eq!("ana@x.com", result.account.email().as_str());
    }

    #[tokio::test]
    async fn wrong_password_fails() {
        let repository = InMemoryAccountRepository::with_accounts([sample_account("ana@x.com")]);

        let result = usecase(repository)
            .login("ana@x.com", PlainPassword::new("nope".to_string()))
            .await;

        assert!(matches!(result, Err(DomainError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn unknown_email_fails() {
        let result = usecase(InMemoryAccountRepository::default())
            .login("ghost@x.com", PlainPassword::new("pw".to_string()))
            .await;

        assert!(matches!(result, Err(DomainError::AuthenticationFailed)));
    }
}

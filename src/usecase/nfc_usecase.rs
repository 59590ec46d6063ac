use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::account::{Account, AccountLookup, NfcToken},
        repositories::account_repository::AccountRepository,
        services::token_service::TokenGenerator,
    },
    usecase::login_usecase::LoginResult,
};

/// Card-based operations: sign-in with a card, bind a card, find a card's owner
pub struct NfcUsecase<R: AccountRepository, T: TokenGenerator> {
    account_repository: R,
    token_generator: T,
}

impl<R: AccountRepository, T: TokenGenerator> NfcUsecase<R, T> {
    pub fn new(account_repository: R, token_generator: T) -> Self {
        Self {
            account_repository,
            token_generator,
        }
    }

    /// Sign in with the token on a card, no password involved
    pub async fn login(&self, uid: &str) -> Result<LoginResult, DomainError> {
        let nfc_token = NfcToken::parse(uid)?;

        let account = self
            .account_repository
            .find_by_nfc_token(&nfc_token)
            .await?
            .ok_or(DomainError::UnknownNfcToken)?;

        let token = self.token_generator.generate(&account)?;
        tracing::info!(account_id = %account.id().as_uuid(), "nfc login");

        Ok(LoginResult { token, account })
    }

    /// Bind a card to an account, replacing its previous token.
    ///
    /// Binding the card an account already holds is a no-op. A card held by
    /// any other account is a conflict.
    pub async fn assign(&self, target: AccountLookup, uid: &str) -> Result<Account, DomainError> {
        let nfc_token = NfcToken::parse(uid)?;
        let account = self.find(&target).await?.ok_or(DomainError::AccountNotFound)?;

        if let Some(owner) = self.account_repository.find_by_nfc_token(&nfc_token).await? {
            if owner.id() != account.id() {
                tracing::info!(
                    account_id = %account.id().as_uuid(),
                    owner_id = %owner.id().as_uuid(),
                    "nfc assignment rejected: card already bound"
                );
                return Err(DomainError::NfcTokenInUse);
            }
            return Ok(owner);
        }

        let account = self
            .account_repository
            .update_nfc_token(account.id(), &nfc_token)
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateNfcToken(_) => DomainError::NfcTokenInUse,
                RepositoryError::NotFound => DomainError::AccountNotFound,
                other => DomainError::Repository(other),
            })?;

        tracing::info!(account_id = %account.id().as_uuid(), "nfc card assigned");
        Ok(account)
    }

    pub async fn owner(&self, uid: &str) -> Result<Account, DomainError> {
        let nfc_token = NfcToken::parse(uid)?;
        self.account_repository
            .find_by_nfc_token(&nfc_token)
            .await?
            .ok_or(DomainError::AccountNotFound)
    }

    async fn find(&self, lookup: &AccountLookup) -> Result<Option<Account>, DomainError> {
        let account = match lookup {
            AccountLookup::Id(id) => self.account_repository.find_by_id(id).await?,
            AccountLookup::NationalId(national_id) => {
                self.account_repository.find_by_national_id(national_id).await?
            }
            AccountLookup::Email(email) => self.account_repository.find_by_email(email).await?,
        };
        Ok(account)
    }
}

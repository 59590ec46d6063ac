use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::account::{Account, AccountId, Email, NewAccount, NfcToken},
};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;
    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Account>, RepositoryError>;
    async fn find_by_nfc_token(&self, nfc_token: &NfcToken) -> Result<Option<Account>, RepositoryError>;

    /// Persist a prepared account.
    ///
    /// The store enforces email uniqueness itself and reports a clash as
    /// [`RepositoryError::DuplicateEmail`], even when a prior lookup found nothing.
    async fn save(&self, account: NewAccount) -> Result<Account, RepositoryError>;

    /// Rebind an account to another NFC token.
    ///
    /// Fails with [`RepositoryError::NotFound`] for an unknown id and with
    /// [`RepositoryError::DuplicateNfcToken`] when another account holds the token.
    async fn update_nfc_token(
        &self,
        id: &AccountId,
        nfc_token: &NfcToken,
    ) -> Result<Account, RepositoryError>;
}

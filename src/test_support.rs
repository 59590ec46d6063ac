use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        account::{Account, AccountId, AccountProfile, Email, NewAccount, NfcToken, Role},
        credential::{HashedPassword, PlainPassword},
    },
    repositories::account_repository::AccountRepository,
    services::password_service::PasswordHasher,
};

#[derive(Clone, Copy, Default)]
enum StoreMode {
    #[default]
    Normal,
    // email and token lookups see nothing, only the unique indexes catch duplicates
    Racing,
    Broken,
}

/// Account store keyed by email, enforcing email and token uniqueness like the real indexes
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    saves: Arc<AtomicUsize>,
    mode: StoreMode,
}

impl InMemoryAccountRepository {
    pub fn racing() -> Self {
        Self {
            mode: StoreMode::Racing,
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            mode: StoreMode::Broken,
            ..Self::default()
        }
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self::default().seeded(accounts)
    }

    pub fn seeded(self, accounts: impl IntoIterator<Item = Account>) -> Self {
        {
            let mut map = self.accounts.lock().unwrap();
            for account in accounts {
                map.insert(account.email().as_str().to_string(), account);
            }
        }
        self
    }

    pub fn stored(&self, email: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(email).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.mode {
            StoreMode::Broken => Err(RepositoryError::DatabaseError("connection refused".to_string())),
            _ => Ok(()),
        }
    }

    fn find_where(&self, predicate: impl Fn(&Account) -> bool) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| predicate(account))
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        self.check()?;
        Ok(self.find_where(|account| account.id() == id))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        self.check()?;
        match self.mode {
            StoreMode::Racing => Ok(None),
            _ => Ok(self.stored(email.as_str())),
        }
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Account>, RepositoryError> {
        self.check()?;
        Ok(self.find_where(|account| account.profile().national_id() == national_id))
    }

    async fn find_by_nfc_token(&self, nfc_token: &NfcToken) -> Result<Option<Account>, RepositoryError> {
        self.check()?;
        match self.mode {
            StoreMode::Racing => Ok(None),
            _ => Ok(self.find_where(|account| account.nfc_token() == nfc_token)),
        }
    }

    async fn save(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        self.check()?;

        let mut accounts = self.accounts.lock().unwrap();
        let key = account.profile().email().as_str().to_string();
        if accounts.contains_key(&key) {
            return Err(RepositoryError::DuplicateEmail(key));
        }
        if accounts.values().any(|a| a.nfc_token() == account.nfc_token()) {
            return Err(RepositoryError::DuplicateNfcToken(account.nfc_token().as_str().to_string()));
        }

        let account = account.into_account(AccountId::new(), Utc::now());
        accounts.insert(key, account.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(account)
    }

    async fn update_nfc_token(
        &self,
        id: &AccountId,
        nfc_token: &NfcToken,
    ) -> Result<Account, RepositoryError> {
        self.check()?;

        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.id() != id && a.nfc_token() == nfc_token)
        {
            return Err(RepositoryError::DuplicateNfcToken(nfc_token.as_str().to_string()));
        }

        let (key, account) = accounts
            .iter()
            .find(|(_, a)| a.id() == id)
            .map(|(key, a)| (key.clone(), a.clone()))
            .ok_or(RepositoryError::NotFound)?;
        let account = account.with_nfc_token(nfc_token.clone());
        accounts.insert(key, account.clone());
        Ok(account)
    }
}

/// Deterministic stand-in for the Argon2 hasher that counts its calls
#[derive(Clone, Default)]
pub struct CountingPasswordHasher {
    hashes: Arc<AtomicUsize>,
}

impl CountingPasswordHasher {
    pub fn expected_hash(plain: &str) -> HashedPassword {
        HashedPassword::new(format!("hashed::{}", plain))
    }

    pub fn hash_count(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingPasswordHasher {
    fn hash(&self, plain_password: &PlainPassword) -> Result<HashedPassword, DomainError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        Ok(Self::expected_hash(plain_password.expose()))
    }

    fn verify(
        &self,
        plain_password: &PlainPassword,
        hashed_password: &HashedPassword,
    ) -> Result<bool, DomainError> {
        Ok(Self::expected_hash(plain_password.expose()) == *hashed_password)
    }
}

/// Persisted student account whose password is "pw" under [`CountingPasswordHasher`]
pub fn sample_account(email: &str) -> Account {
    sample_account_with_token(email, NfcToken::from_number(1))
}

pub fn sample_account_with_token(email: &str, nfc_token: NfcToken) -> Account {
    Account::reconstruct(
        AccountId::new(),
        AccountProfile::new(
            "123".to_string(),
            "Ana".to_string(),
            "Lopez".to_string(),
            Email::parse(email).unwrap(),
        ),
        CountingPasswordHasher::expected_hash("pw"),
        Role::DEFAULT,
        nfc_token,
        Utc::now(),
    )
}

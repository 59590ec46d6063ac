use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use entity::usuarios;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    sea_query::Expr,
};

use crate::domain::{
    error::RepositoryError,
    models::{
        account::{Account, AccountId, AccountProfile, Email, NewAccount, NfcToken, Role},
        credential::HashedPassword,
    },
    repositories::account_repository::AccountRepository,
};

#[derive(Clone)]
pub struct SeaOrmAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    async fn find_one(&self, column: usuarios::Column, value: &str) -> Result<Option<Account>, RepositoryError> {
        let account = usuarios::Entity::find()
            .filter(column.eq(value))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        account.map(to_account).transpose()
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let account = usuarios::Entity::find_by_id(*id.as_uuid())
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        account.map(to_account).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        self.find_one(usuarios::Column::Gmail, email.as_str()).await
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Account>, RepositoryError> {
        self.find_one(usuarios::Column::Dni, national_id).await
    }

    async fn find_by_nfc_token(&self, nfc_token: &NfcToken) -> Result<Option<Account>, RepositoryError> {
        self.find_one(usuarios::Column::NfcToken, nfc_token.as_str()).await
    }

    async fn save(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let id = AccountId::new();
        let created_at = Utc::now();

        let profile = account.profile();
        let model = usuarios::ActiveModel {
            id: Set(*id.as_uuid()),
            dni: Set(profile.national_id().to_string()),
            nombre: Set(profile.first_name().to_string()),
            apellidos: Set(profile.last_name().to_string()),
            gmail: Set(profile.email().as_str().to_string()),
            password: Set(account.password_hash().as_str().to_string()),
            rol: Set(account.role().as_str().to_string()),
            nfc_token: Set(account.nfc_token().as_str().to_string()),
            created_at: Set(created_at.fixed_offset()),
        };

        usuarios::Entity::insert(model)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| write_error(e, profile.email(), account.nfc_token()))?;

        Ok(account.into_account(id, created_at))
    }

    async fn update_nfc_token(
        &self,
        id: &AccountId,
        nfc_token: &NfcToken,
    ) -> Result<Account, RepositoryError> {
        let account = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

        let result = usuarios::Entity::update_many()
            .col_expr(usuarios::Column::NfcToken, Expr::value(nfc_token.as_str()))
            .filter(usuarios::Column::Id.eq(*id.as_uuid()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| write_error(e, account.email(), nfc_token))?;

        // deleted between the lookup and the update
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(account.with_nfc_token(nfc_token.clone()))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum UniqueKey {
    Email,
    NfcToken,
}

fn write_error(err: DbErr, email: &Email, nfc_token: &NfcToken) -> RepositoryError {
    let clash = match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            clashing_key(&detail, email.as_str(), nfc_token.as_str())
        }
        _ => None,
    };

    match clash {
        Some(UniqueKey::Email) => RepositoryError::DuplicateEmail(email.as_str().to_string()),
        Some(UniqueKey::NfcToken) => RepositoryError::DuplicateNfcToken(nfc_token.as_str().to_string()),
        None => RepositoryError::DatabaseError(err.to_string()),
    }
}

/// Which unique value a violation is about.
///
/// MySQL reports `Duplicate entry '<value>' for key '<index>'`. The duplicated
/// value is compared first, so an index with an unexpected name still resolves;
/// the index name is the fallback.
fn clashing_key(detail: &str, email: &str, nfc_token: &str) -> Option<UniqueKey> {
    let parsed = detail
        .split_once("Duplicate entry '")
        .and_then(|(_, rest)| rest.rsplit_once("' for key '"));
    let (entry, key) = match parsed {
        Some((entry, key)) => (Some(entry), key.trim_end_matches('\'')),
        None => (None, detail),
    };

    if entry == Some(email) {
        Some(UniqueKey::Email)
    } else if entry == Some(nfc_token) {
        Some(UniqueKey::NfcToken)
    } else if key.contains("gmail") {
        Some(UniqueKey::Email)
    } else if key.contains("nfc_token") {
        Some(UniqueKey::NfcToken)
    } else {
        None
    }
}

fn to_account(model: usuarios::Model) -> Result<Account, RepositoryError> {
    let email =
        Email::parse(&model.gmail).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
    let role = model
        .rol
        .parse::<Role>()
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(Account::reconstruct(
        AccountId::from_uuid(model.id),
        AccountProfile::new(model.dni, model.nombre, model.apellidos, email),
        HashedPassword::new(model.password),
        role,
        NfcToken::from_stored(model.nfc_token),
        model.created_at.with_timezone(&Utc),
    ))
}

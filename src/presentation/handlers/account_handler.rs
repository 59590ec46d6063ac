use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        models::{
            account::{Account, AccountLookup, RegistrationForm},
            credential::PlainPassword,
        },
        repositories::account_repository::AccountRepository,
        services::{
            password_service::PasswordHasher,
            token_service::{NfcTokenGenerator, TokenGenerator},
        },
    },
    presentation::error::ApiError,
    usecase::{
        login_usecase::LoginUsecase, nfc_usecase::NfcUsecase,
        register_account_usecase::RegisterAccountUsecase,
    },
};

// Request

/// json for register request
///
/// Every field is optional at the wire level so that an absent field is
/// reported as a missing-field error instead of a parse failure. Any
/// `nfcToken` sent by the caller is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub dni: Option<String>,
    pub password: Option<String>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub gmail: Option<String>,
    pub rol: Option<String>,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(request: RegisterRequest) -> Self {
        Self {
            national_id: request.dni,
            password: request.password.map(PlainPassword::new),
            first_name: request.nombre,
            last_name: request.apellidos,
            email: request.gmail,
            role: request.rol,
        }
    }
}

/// json for login request
#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub gmail: String,
    pub password: String,
}

/// json for card sign-in
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NfcLoginRequest {
    pub uid: Option<String>,
}

/// json for binding a card to an account named by id, dni or gmail
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssignNfcRequest {
    pub uid: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub dni: Option<String>,
    pub gmail: Option<String>,
}

// Response

/// Persisted account as returned to the caller. `password` is the stored hash.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: String,
    pub dni: String,
    pub nombre: String,
    pub apellidos: String,
    pub gmail: String,
    pub password: String,
    pub rol: String,
    pub nfc_token: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        let profile = account.profile();
        Self {
            id: account.id().as_uuid().to_string(),
            dni: profile.national_id().to_string(),
            nombre: profile.first_name().to_string(),
            apellidos: profile.last_name().to_string(),
            gmail: profile.email().as_str().to_string(),
            password: account.password_hash().as_str().to_string(),
            rol: account.role().as_str().to_string(),
            nfc_token: account.nfc_token().as_str().to_string(),
            created_at: account.created_at(),
        }
    }
}

/// json for register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub usuario: AccountInfo,
    #[serde(rename = "nfcToken")]
    pub nfc_token: String,
}

/// json for login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: AccountInfo,
}

/// json for card assignment response
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub usuario: AccountInfo,
}

/// Public view of a card owner, without credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct NfcOwner {
    pub id: String,
    pub nombre: String,
    pub apellidos: String,
    pub gmail: String,
    pub rol: String,
}

impl From<Account> for NfcOwner {
    fn from(account: Account) -> Self {
        let profile = account.profile();
        Self {
            id: account.id().as_uuid().to_string(),
            nombre: profile.first_name().to_string(),
            apellidos: profile.last_name().to_string(),
            gmail: profile.email().as_str().to_string(),
            rol: account.role().as_str().to_string(),
        }
    }
}

/// json for card owner lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct NfcOwnerResponse {
    pub usuario: NfcOwner,
}

/* Router Function and Handler Function */

/// Router for account registration, login and NFC cards
/// Suppose to be nested by main router
pub fn create_account_router<R, P, N, T>(
    register_service: RegisterAccountUsecase<R, P, N>,
    login_service: LoginUsecase<R, P, T>,
    nfc_service: NfcUsecase<R, T>,
) -> Router
where
    R: AccountRepository + 'static,
    P: PasswordHasher + 'static,
    N: NfcTokenGenerator + 'static,
    T: TokenGenerator + 'static,
{
    let state = AppState {
        register_service: Arc::new(register_service),
        login_service: Arc::new(login_service),
        nfc_service: Arc::new(nfc_service),
    };

    Router::new()
        .route("/register", post(register::<R, P, N, T>))
        .route("/login", post(login::<R, P, N, T>))
        .route("/login-nfc", post(login_nfc::<R, P, N, T>))
        .route("/asignar-nfc", post(assign_nfc::<R, P, N, T>))
        .route("/nfc/{uid}", get(nfc_owner::<R, P, N, T>))
        .with_state(state)
}

pub struct AppState<R, P, N, T>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    pub register_service: Arc<RegisterAccountUsecase<R, P, N>>,
    pub login_service: Arc<LoginUsecase<R, P, T>>,
    pub nfc_service: Arc<NfcUsecase<R, T>>,
}

// Arc fields only, so no Clone bound on the services themselves
impl<R, P, N, T> Clone for AppState<R, P, N, T>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    fn clone(&self) -> Self {
        Self {
            register_service: Arc::clone(&self.register_service),
            login_service: Arc::clone(&self.login_service),
            nfc_service: Arc::clone(&self.nfc_service),
        }
    }
}

// handler function

/// handler function for register
async fn register<R, P, N, T>(
    State(state): State<AppState<R, P, N, T>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    let Json(payload) = payload?;
    let result = state.register_service.register(payload.into()).await?;

    Ok(Json(RegisterResponse {
        usuario: result.account.into(),
        nfc_token: result.nfc_token.as_str().to_string(),
    }))
}

/// handler function for login
async fn login<R, P, N, T>(
    State(state): State<AppState<R, P, N, T>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    let Json(payload) = payload?;
    let result = state
        .login_service
        .login(&payload.gmail, PlainPassword::new(payload.password))
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        usuario: result.account.into(),
    }))
}

/// handler function for card sign-in
async fn login_nfc<R, P, N, T>(
    State(state): State<AppState<R, P, N, T>>,
    payload: Result<Json<NfcLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    let Json(payload) = payload?;
    let result = state
        .nfc_service
        .login(payload.uid.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        usuario: result.account.into(),
    }))
}

/// handler function for binding a card
async fn assign_nfc<R, P, N, T>(
    State(state): State<AppState<R, P, N, T>>,
    payload: Result<Json<AssignNfcRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, ApiError>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    let Json(payload) = payload?;
    let uid = payload.uid.unwrap_or_default();
    let target = AccountLookup::from_identifiers(payload.user_id, payload.dni, payload.gmail)?;
    let account = state.nfc_service.assign(target, &uid).await?;

    Ok(Json(AccountResponse {
        usuario: account.into(),
    }))
}

/// handler function for card owner lookup
async fn nfc_owner<R, P, N, T>(
    State(state): State<AppState<R, P, N, T>>,
    Path(uid): Path<String>,
) -> Result<Json<NfcOwnerResponse>, ApiError>
where
    R: AccountRepository,
    P: PasswordHasher,
    N: NfcTokenGenerator,
    T: TokenGenerator,
{
    let owner = state.nfc_service.owner(&uid).await?;

    Ok(Json(NfcOwnerResponse {
        usuario: owner.into(),
    }))
}

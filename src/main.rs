mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;
mod usecase;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::AppConfig,
    infrastructure::{
        account_repository::SeaOrmAccountRepository, argon2_password_hasher::Argon2PasswordHasher,
        database, jwt_token_generator::JwtTokenGenerator,
        random_nfc_token_generator::RandomNfcTokenGenerator,
    },
    presentation::handlers::account_handler::create_account_router,
    usecase::{
        login_usecase::LoginUsecase, nfc_usecase::NfcUsecase,
        register_account_usecase::RegisterAccountUsecase,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registro_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        db_max_connections = config.db_max_connections,
        db_sync_schema = config.db_sync_schema,
        "starting registro-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db = database::connect(&config).await?;
    if config.db_sync_schema {
        database::ensure_schema(&db).await?;
    }

    let account_repository = SeaOrmAccountRepository::new(db);
    let password_hasher = Argon2PasswordHasher::new();
    let register_usecase = RegisterAccountUsecase::new(
        account_repository.clone(),
        password_hasher.clone(),
        RandomNfcTokenGenerator::new(),
    );
    let session_tokens =
        JwtTokenGenerator::with_expiration(config.jwt_secret.clone(), config.jwt_expiration_hours);
    let login_usecase = LoginUsecase::new(
        account_repository.clone(),
        password_hasher,
        session_tokens.clone(),
    );
    let nfc_usecase = NfcUsecase::new(account_repository, session_tokens);

    let app = build_app(create_account_router(
        register_usecase,
        login_usecase,
        nfc_usecase,
    ));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Mount the account routes under `/api/usuarios` next to the liveness route
fn build_app(account_router: Router) -> Router {
    Router::new()
        .route("/", get(|| async { "registro-api up" }))
        .nest("/api/usuarios", account_router)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

pub mod account_repository;
pub mod argon2_password_hasher;
pub mod database;
pub mod jwt_token_generator;
pub mod random_nfc_token_generator;

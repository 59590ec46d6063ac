pub mod login_usecase;
pub mod nfc_usecase;
pub mod register_account_usecase;

use rand_core::{OsRng, TryRngCore};

use crate::domain::{
    error::DomainError, models::account::NfcToken, services::token_service::NfcTokenGenerator,
};

/// 128 random bits from the operating system, rendered as decimal digits
#[derive(Clone, Default)]
pub struct RandomNfcTokenGenerator;

impl RandomNfcTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl NfcTokenGenerator for RandomNfcTokenGenerator {
    fn generate(&self) -> Result<NfcToken, DomainError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DomainError::TokenGeneration(e.to_string()))?;

        Ok(NfcToken::from_number(u128::from_be_bytes(bytes)))
    }
}

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, PlainPassword},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountId(Uuid);
impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalised (trimmed, lower-cased) email address, the uniqueness key of an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);
impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if !looks_like_email(&normalized) {
            return Err(DomainError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// local@domain.tld, no whitespace and a single '@'
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Alumno,
    Profesor,
    Admin,
}

impl Role {
    /// Role given to every self-registered account
    pub const DEFAULT: Role = Role::Alumno;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Alumno => "ALUMNO",
            Role::Profesor => "PROFESOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALUMNO" | "STUDENT" => Ok(Role::Alumno),
            "PROFESOR" | "PROFESSOR" | "TEACHER" => Ok(Role::Profesor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card identifier bound to an account.
///
/// Registration mints `NFC` followed by digits; a card UID assigned later replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NfcToken(String);
impl NfcToken {
    pub const PREFIX: &'static str = "NFC";

    pub fn from_number(value: u128) -> Self {
        Self(format!("{}{:039}", Self::PREFIX, value))
    }

    /// Wrap a token read back from storage
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Token presented by a client, e.g. the UID read from a card. Blank is missing.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingField);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How a caller names the account a card is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Id(AccountId),
    NationalId(String),
    Email(Email),
}

impl AccountLookup {
    /// Pick the first identifier supplied, in order id, dni, email
    pub fn from_identifiers(
        id: Option<String>,
        national_id: Option<String>,
        email: Option<String>,
    ) -> Result<Self, DomainError> {
        if let Some(id) = non_blank(id) {
            let uuid = Uuid::parse_str(&id).map_err(|_| DomainError::InvalidAccountId(id.clone()))?;
            return Ok(Self::Id(AccountId::from_uuid(uuid)));
        }
        if let Some(national_id) = non_blank(national_id) {
            return Ok(Self::NationalId(national_id.to_uppercase()));
        }
        match non_blank(email) {
            Some(email) => Ok(Self::Email(Email::parse(&email)?)),
            None => Err(DomainError::MissingField),
        }
    }
}

/// Raw registration input. Every field may be missing at this stage.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub national_id: Option<String>,
    pub password: Option<PlainPassword>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl RegistrationForm {
    /// Check the required fields, normalise them and resolve the role.
    ///
    /// Blank values count as missing. A missing role falls back to
    /// [`Role::DEFAULT`]; an unrecognised one is rejected.
    pub fn validate(self) -> Result<ValidRegistration, DomainError> {
        let national_id = non_blank(self.national_id).map(|v| v.to_uppercase());
        let password = self.password.filter(|p| !p.expose().trim().is_empty());
        let first_name = non_blank(self.first_name);
        let last_name = non_blank(self.last_name);
        let email = non_blank(self.email);

        let (Some(national_id), Some(password), Some(first_name), Some(last_name), Some(email)) =
            (national_id, password, first_name, last_name, email)
        else {
            return Err(DomainError::MissingField);
        };

        let email = Email::parse(&email)?;
        let role = match non_blank(self.role) {
            Some(role) => role.parse()?,
            None => Role::DEFAULT,
        };

        Ok(ValidRegistration {
            profile: AccountProfile::new(national_id, first_name, last_name, email),
            password,
            role,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    national_id: String,
    first_name: String,
    last_name: String,
    email: Email,
}

impl AccountProfile {
    pub fn new(national_id: String, first_name: String, last_name: String, email: Email) -> Self {
        Self {
            national_id,
            first_name,
            last_name,
            email,
        }
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Registration that passed validation but still holds the plaintext password
#[derive(Debug)]
pub struct ValidRegistration {
    profile: AccountProfile,
    password: PlainPassword,
    role: Role,
}

impl ValidRegistration {
    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }
    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
    pub fn role(&self) -> Role {
        self.role
    }

    /// Drop the plaintext and attach the hash and token
    pub fn prepare(self, password_hash: HashedPassword, nfc_token: NfcToken) -> NewAccount {
        NewAccount {
            profile: self.profile,
            password_hash,
            role: self.role,
            nfc_token,
        }
    }
}

/// Fully prepared account, ready for the store
#[derive(Debug, Clone)]
pub struct NewAccount {
    profile: AccountProfile,
    password_hash: HashedPassword,
    role: Role,
    nfc_token: NfcToken,
}

impl NewAccount {
    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn nfc_token(&self) -> &NfcToken {
        &self.nfc_token
    }

    /// Attach the storage-assigned identity
    pub fn into_account(self, id: AccountId, created_at: DateTime<Utc>) -> Account {
        Account {
            id,
            profile: self.profile,
            password_hash: self.password_hash,
            role: self.role,
            nfc_token: self.nfc_token,
            created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    profile: AccountProfile,
    password_hash: HashedPassword,
    role: Role,
    nfc_token: NfcToken,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn reconstruct(
        id: AccountId,
        profile: AccountProfile,
        password_hash: HashedPassword,
        role: Role,
        nfc_token: NfcToken,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            password_hash,
            role,
            nfc_token,
            created_at,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }
    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }
    pub fn email(&self) -> &Email {
        self.profile.email()
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn nfc_token(&self) -> &NfcToken {
        &self.nfc_token
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_nfc_token(self, nfc_token: NfcToken) -> Self {
        Self { nfc_token, ..self }
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[fixture]
    fn form() -> RegistrationForm {
        RegistrationForm {
            national_id: Some("123".to_string()),
            password: Some(PlainPassword::new("pw".to_string())),
            first_name: Some("Ana".to_string()),
            last_name: Some("Lopez".to_string()),
            email: Some("ana@x.com".to_string()),
            role: None,
        }
    }

    #[rstest]
    fn valid_form_defaults_role(form: RegistrationForm) {
        let valid = form.validate().unwrap();
        assert_eq!(Role::DEFAULT, valid.role());
        assert_eq!("ana@x.com", valid.profile().email().as_str());
        assert_eq!("pw", valid.password().expose());
    }

    #[rstest]
    #[case::national_id(|f: &mut RegistrationForm| f.national_id = None)]
    #[case::password(|f: &mut RegistrationForm| f.password = None)]
    #[case::first_name(|f: &mut RegistrationForm| f.first_name = None)]
    #[case::last_name(|f: &mut RegistrationForm| f.last_name = None)]
    #[case::email(|f: &mut RegistrationForm| f.email = None)]
    #[case::blank_name(|f: &mut RegistrationForm| f.first_name = Some("   ".to_string()))]
    #[case::empty_password(|f: &mut RegistrationForm| f.password = Some(PlainPassword::new(String::new())))]
    fn missing_field_is_rejected(mut form: RegistrationForm, #[case] strip: fn(&mut RegistrationForm)) {
        strip(&mut form);
        assert!(matches!(form.validate(), Err(DomainError::MissingField)));
    }

    #[rstest]
    fn supplied_role_is_kept(mut form: RegistrationForm) {
        form.role = Some("profesor".to_string());
        assert_eq!(Role::Profesor, form.validate().unwrap().role());
    }

    #[rstest]
    fn unknown_role_is_rejected(mut form: RegistrationForm) {
        form.role = Some("SUPERUSER".to_string());
        assert!(matches!(form.validate(), Err(DomainError::InvalidRole(r)) if r == "SUPERUSER"));
    }

    #[rstest]
    fn blank_role_falls_back_to_default(mut form: RegistrationForm) {
        form.role = Some(" ".to_string());
        assert_eq!(Role::DEFAULT, form.validate().unwrap().role());
    }

    #[rstest]
    fn fields_are_normalised(mut form: RegistrationForm) {
        form.email = Some("  Ana@X.Com ".to_string());
        form.national_id = Some(" 12345678a ".to_string());
        let valid = form.validate().unwrap();
        assert_eq!("ana@x.com", valid.profile().email().as_str());
        assert_eq!("12345678A", valid.profile().national_id());
    }

    #[rstest]
    #[case("ana")]
    #[case("ana@")]
    #[case("@x.com")]
    #[case("ana@x")]
    #[case("ana@.com")]
    #[case("an a@x.com")]
    #[case("ana@x@y.com")]
    fn malformed_email_is_rejected(#[case] raw: &str) {
        assert!(matches!(Email::parse(raw), Err(DomainError::InvalidEmail)));
    }

    #[rstest]
    #[case("STUDENT", Role::Alumno)]
    #[case("Alumno", Role::Alumno)]
    #[case("TEACHER", Role::Profesor)]
    #[case("admin", Role::Admin)]
    fn role_parsing_accepts_aliases(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(expected, raw.parse::<Role>().unwrap());
    }

    #[test]
    fn nfc_token_is_prefixed_and_fixed_width() {
        let token = NfcToken::from_number(42);
        assert!(token.as_str().starts_with(NfcToken::PREFIX));
        assert_eq!(3 + 39, token.as_str().len());
        assert!(token.as_str()[3..].chars().all(|c| c.is_ascii_digit()));

        let max = NfcToken::from_number(u128::MAX);
        assert_eq!(3 + 39, max.as_str().len());
    }

    #[test]
    fn presented_nfc_token_is_trimmed_and_required() {
        assert_eq!("04A1B2", NfcToken::parse(" 04A1B2 ").unwrap().as_str());
        assert!(matches!(NfcToken::parse("  "), Err(DomainError::MissingField)));
    }

    #[rstest]
    #[case::id_wins(Some("00000000-0000-0000-0000-000000000001"), Some("123"), None)]
    #[case::id_only(Some("00000000-0000-0000-0000-000000000001"), None, None)]
    fn lookup_prefers_account_id(
        #[case] id: Option<&str>,
        #[case] national_id: Option<&str>,
        #[case] email: Option<&str>,
    ) {
        let lookup = AccountLookup::from_identifiers(
            id.map(str::to_string),
            national_id.map(str::to_string),
            email.map(str::to_string),
        )
        .unwrap();
        assert!(matches!(lookup, AccountLookup::Id(_)));
    }

    #[test]
    fn lookup_falls_back_to_dni_then_email() {
        let by_dni =
            AccountLookup::from_identifiers(Some(" ".to_string()), Some("12345678a".to_string()), None)
                .unwrap();
        assert_eq!(AccountLookup::NationalId("12345678A".to_string()), by_dni);

        let by_email = AccountLookup::from_identifiers(None, None, Some("Ana@X.com".to_string())).unwrap();
        assert_eq!(AccountLookup::Email(Email::parse("ana@x.com").unwrap()), by_email);
    }

    #[test]
    fn lookup_needs_an_identifier() {
        assert!(matches!(
            AccountLookup::from_identifiers(None, None, None),
            Err(DomainError::MissingField)
        ));
        assert!(matches!(
            AccountLookup::from_identifiers(Some("abc".to_string()), None, None),
            Err(DomainError::InvalidAccountId(id)) if id == "abc"
        ));
    }
}

//! Password primitives: raw passwords, stored hashes and argon2id hashing.
//!
//! Raw passwords are zeroised on drop and never printed. Stored hashes are
//! PHC strings (`$argon2id$v=19$...`) carrying their own salt and parameters,
//! so verification works across parameter changes.

use std::fmt;

use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore as _;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Minimum password length, counted in Unicode scalar values.
pub const PASSWORD_MIN_LEN: usize = 10;

const SALT_LEN: usize = 16;
const DUMMY_PASSWORD: &str = "timing-parity-placeholder";

/// Errors raised while deriving or parsing password hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("password must be at least {min} characters long")]
    TooShort { min: usize },
    #[error("invalid argon2 parameters: {message}")]
    Params { message: String },
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    #[error("stored password hash is malformed")]
    Malformed,
}

/// Caller-supplied password, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Length in Unicode scalar values, the unit the length policy uses.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the password satisfies [`PASSWORD_MIN_LEN`].
    pub fn meets_minimum_length(&self) -> bool {
        self.char_len() >= PASSWORD_MIN_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// Stored one-way password hash in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Accept a PHC string read back from storage.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PhcString::new(&phc).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Self(phc))
    }

    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Argon2id hashing with configurable cost.
///
/// The default uses the argon2 crate's recommended parameters. Cheaper
/// parameters are available through [`PasswordHashing::with_cost`] for tests.
///
/// # Examples
/// ```
/// use careportal::domain::{PasswordHashing, PlainPassword};
///
/// let hashing = PasswordHashing::with_cost(8, 1, 1).expect("valid cost");
/// let password = PlainPassword::new("longenough1");
/// let hash = hashing.hash(&password).expect("hash");
/// assert!(hashing.verify(&password, &hash));
/// assert!(!hashing.verify(&PlainPassword::new("wrongpass1"), &hash));
/// ```
#[derive(Clone)]
pub struct PasswordHashing {
    params: Params,
    dummy: Option<PasswordHash>,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHashing {
    /// Build hashing with `params`; the dummy hash is derived up front.
    pub fn new(params: Params) -> Self {
        let mut hashing = Self {
            params,
            dummy: None,
        };
        hashing.dummy = hashing.derive(DUMMY_PASSWORD).ok();
        hashing
    }

    /// Build hashing with explicit memory (KiB), iteration and lane costs.
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|err| {
            PasswordHashError::Params {
                message: err.to_string(),
            }
        })?;
        Ok(Self::new(params))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Derive a salted hash, rejecting passwords below the minimum length.
    pub fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHashError> {
        if !password.meets_minimum_length() {
            return Err(PasswordHashError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        self.derive(password.expose())
    }

    fn derive(&self, raw: &str) -> Result<PasswordHash, PasswordHashError> {
        let mut bytes = [0_u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        let salt = SaltString::encode_b64(&bytes).map_err(|err| PasswordHashError::Hashing {
            message: err.to_string(),
        })?;
        self.argon2()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| PasswordHash(hash.to_string()))
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })
    }

    /// Verify `password` against `hash`.
    ///
    /// The digest comparison inside `argon2` is constant-time.
    pub fn verify(&self, password: &PlainPassword, hash: &PasswordHash) -> bool {
        match PhcString::new(hash.as_phc()) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.expose().as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spend the same effort as a real verification without a stored hash.
    ///
    /// Used when a username is unknown so both login failures cost the same.
    pub fn verify_dummy(&self, password: &PlainPassword) {
        if let Some(hash) = &self.dummy {
            let _matched = self.verify(password, hash);
        }
    }
}

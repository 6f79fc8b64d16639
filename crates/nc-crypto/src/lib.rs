use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub mod seed_phrase;

pub use seed_phrase::{SeedPhrase, generate_seed_phrase, normalize_seed_phrase, parse_seed_phrase};

const ED25519_PREFIX: &str = "ed25519";

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("unsupported key type '{0}'")]
    UnsupportedKeyType(String),
    #[error("invalid base58 key data: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },
    #[error("invalid seed phrase: {0}")]
    SeedPhrase(String),
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Splits `ed25519:<base58>` into its data part. A bare base58 string is
/// read as ed25519.
fn key_data(encoded: &str) -> Result<&str, CryptoError> {
    match encoded.split_once(':') {
        Some((kind, data)) if kind.eq_ignore_ascii_case(ED25519_PREFIX) => Ok(data),
        Some((kind, _)) => Err(CryptoError::UnsupportedKeyType(kind.to_owned())),
        None => Ok(encoded),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        key.verify(message, &Signature::from_bytes(signature)).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ED25519_PREFIX}:{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = bs58::decode(key_data(s)?).into_vec()?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::KeyLength { expected: 32, actual: raw.len() })?;
        Ok(Self(bytes))
    }
}

/// Ed25519 key pair in the NEAR string encoding.
///
/// The secret form is `ed25519:<base58(seed || public key)>`, which is what the
/// browser key store persists.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_random() -> Self {
        let mut rng = OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn secret_key(&self) -> String {
        let bytes = Zeroizing::new(self.signing_key.to_keypair_bytes());
        format!("{ED25519_PREFIX}:{}", bs58::encode(&bytes[..]).into_string())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl FromStr for KeyPair {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = Zeroizing::new(bs58::decode(key_data(s)?).into_vec()?);
        if raw.len() != 64 && raw.len() != 32 {
            return Err(CryptoError::KeyLength { expected: 64, actual: raw.len() });
        }
        let mut seed = Zeroizing::new([0_u8; 32]);
        seed.copy_from_slice(&raw[..32]);
        Ok(Self::from_seed(&seed))
    }
}

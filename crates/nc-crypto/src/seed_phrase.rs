//! BIP-39 seed phrases for NEAR accounts.
//!
//! Keys are derived with SLIP-10 (ed25519, hardened only) along
//! `m/44'/397'/0'`, the path NEAR wallets use for seed-phrase recovery.

use crate::{CryptoError, KeyPair};
use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha512;
use zeroize::Zeroizing;

const KEY_DERIVATION_PATH: [u32; 3] = [44, 397, 0];
const HARDENED_OFFSET: u32 = 0x8000_0000;
const ENTROPY_BYTES: usize = 16;

pub struct SeedPhrase {
    pub seed_phrase: String,
    pub key_pair: KeyPair,
}

impl SeedPhrase {
    pub fn public_key(&self) -> String {
        self.key_pair.public_key().to_string()
    }

    pub fn secret_key(&self) -> String {
        self.key_pair.secret_key()
    }
}

/// Generate a fresh 12-word phrase and the key pair it recovers to.
pub fn generate_seed_phrase() -> Result<SeedPhrase, CryptoError> {
    let mut entropy = Zeroizing::new([0_u8; ENTROPY_BYTES]);
    OsRng.fill_bytes(&mut entropy[..]);
    let mnemonic =
        Mnemonic::from_entropy(&entropy[..]).map_err(|e| CryptoError::SeedPhrase(e.to_string()))?;
    parse_seed_phrase(&mnemonic.to_string())
}

/// Lowercase and collapse whitespace, so hand-typed phrases recover the same key.
pub fn normalize_seed_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_seed_phrase(phrase: &str) -> Result<SeedPhrase, CryptoError> {
    let normalized = normalize_seed_phrase(phrase);
    let mnemonic = Mnemonic::parse_normalized(&normalized)
        .map_err(|e| CryptoError::SeedPhrase(e.to_string()))?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));
    let key = derive_ed25519(&seed[..], &KEY_DERIVATION_PATH)?;

    Ok(SeedPhrase {
        seed_phrase: normalized,
        key_pair: KeyPair::from_seed(&key),
    })
}

fn derive_ed25519(seed: &[u8], path: &[u32]) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let (mut key, mut chain_code) = split(hmac_sha512(b"ed25519 seed", seed)?);

    for index in path {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        data.push(0);
        data.extend_from_slice(&key[..]);
        data.extend_from_slice(&(index | HARDENED_OFFSET).to_be_bytes());
        (key, chain_code) = split(hmac_sha512(&chain_code[..], &data)?);
    }

    Ok(key)
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let mut mac = Hmac::<Sha512>::new_from_slice(key)
        .map_err(|e| CryptoError::Derivation(e.to_string()))?;
    mac.update(data);
    let mut out = Zeroizing::new([0_u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn split(block: Zeroizing<[u8; 64]>) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let mut key = Zeroizing::new([0_u8; 32]);
    let mut chain_code = Zeroizing::new([0_u8; 32]);
    key.copy_from_slice(&block[..32]);
    chain_code.copy_from_slice(&block[32..]);
    (key, chain_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn to_hex(input: &[u8]) -> String {
        input.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn slip10_master_and_first_child_match_reference_vector() {
        let seed: Vec<u8> = (0_u8..16).collect();

        let master = derive_ed25519(&seed, &[]).unwrap();
        assert_eq!(
            to_hex(&master[..]),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );

        let child = derive_ed25519(&seed, &[0]).unwrap();
        assert_eq!(
            to_hex(&child[..]),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn parsing_is_deterministic_and_normalizes_input() {
        let a = parse_seed_phrase(PHRASE).unwrap();
        let b = parse_seed_phrase(&format!("  {}  ", PHRASE.to_uppercase())).unwrap();

        assert_eq!(b.seed_phrase, PHRASE);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.secret_key(), b.secret_key());
    }

    #[test]
    fn generated_phrase_has_twelve_words_and_recovers() {
        let generated = generate_seed_phrase().unwrap();
        assert_eq!(generated.seed_phrase.split(' ').count(), 12);

        let recovered = parse_seed_phrase(&generated.seed_phrase).unwrap();
        assert_eq!(recovered.public_key(), generated.public_key());
        assert!(generated.public_key().starts_with("ed25519:"));
    }

    #[test]
    fn invalid_checksum_is_rejected() {
        let bad = PHRASE.replace("about", "abandon");
        assert!(matches!(
            parse_seed_phrase(&bad),
            Err(CryptoError::SeedPhrase(_))
        ));
    }
}

//! Borsh wire format for the transactions this app sends.
//!
//! Only the `FunctionCall` action is modelled; its tag matches its position in
//! the protocol's action enum.

use crate::ChainError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use borsh::BorshSerialize;
use nc_crypto::{KeyPair, PublicKey};
use nc_types::AccountId;
use serde_json::Value;
use sha2::{Digest, Sha256};

const ED25519_KEY_TYPE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct WirePublicKey {
    key_type: u8,
    data: [u8; 32],
}

impl From<&PublicKey> for WirePublicKey {
    fn from(key: &PublicKey) -> Self {
        Self {
            key_type: ED25519_KEY_TYPE,
            data: *key.as_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct WireSignature {
    key_type: u8,
    data: [u8; 64],
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl Action {
    const FUNCTION_CALL_TAG: u8 = 2;

    pub fn function_call(method_name: &str, args: &Value, gas: u64, deposit: u128) -> Self {
        Self::FunctionCall(FunctionCallAction {
            method_name: method_name.to_owned(),
            args: args.to_string().into_bytes(),
            gas,
            deposit,
        })
    }
}

impl BorshSerialize for Action {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Self::FunctionCall(call) => {
                Self::FUNCTION_CALL_TAG.serialize(writer)?;
                call.serialize(writer)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: WirePublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    pub fn new(
        signer_id: &AccountId,
        public_key: &PublicKey,
        receiver_id: &AccountId,
        nonce: u64,
        block_hash: [u8; 32],
        actions: Vec<Action>,
    ) -> Self {
        Self {
            signer_id: signer_id.0.clone(),
            public_key: public_key.into(),
            nonce,
            receiver_id: receiver_id.0.clone(),
            block_hash,
            actions,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ChainError> {
        borsh::to_vec(self).map_err(|e| ChainError::Encoding(e.to_string()))
    }

    pub fn to_base64(&self) -> Result<String, ChainError> {
        Ok(STANDARD.encode(self.to_bytes()?))
    }

    /// SHA-256 of the serialized transaction; this is what gets signed.
    pub fn hash(&self) -> Result<[u8; 32], ChainError> {
        let digest = Sha256::digest(self.to_bytes()?);
        let mut hash = [0_u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }

    pub fn sign(self, key_pair: &KeyPair) -> Result<SignedTransaction, ChainError> {
        let signature = key_pair.sign(&self.hash()?);
        Ok(SignedTransaction {
            transaction: self,
            signature: WireSignature {
                key_type: ED25519_KEY_TYPE,
                data: signature,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: WireSignature,
}

impl SignedTransaction {
    pub fn to_base64(&self) -> Result<String, ChainError> {
        let bytes = borsh::to_vec(self).map_err(|e| ChainError::Encoding(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }

    pub fn signature_bytes(&self) -> &[u8; 64] {
        &self.signature.data
    }
}

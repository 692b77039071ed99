//! Transaction types and utilities

use crate::common::{GatewayError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Gas attached when the caller only needs the call payload
pub const VIEW_ONLY_GAS: u64 = 50_000_000_000_000;

/// Gas attached when the payload is wrapped into a signable transaction
pub const TRANSACTION_GAS: u64 = 200_000_000_000_000;

/// Access-key sequence number
pub type Nonce = u64;

/// Account and public key that will sign the transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerIdentity {
    /// Signer account ID
    pub account_id: String,
    /// Signer public key, `ed25519:<base58>`
    pub public_key: String,
}

impl SignerIdentity {
    pub fn new(account_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            public_key: public_key.into(),
        }
    }
}

/// Which consumer the call payload is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPath {
    /// Payload returned as-is, signing is scheduled elsewhere
    ViewOnly,
    /// Payload wrapped into a [`TransactionEnvelope`](super::TransactionEnvelope)
    Transaction,
}

impl CallPath {
    pub fn gas(&self) -> u64 {
        match self {
            CallPath::ViewOnly => VIEW_ONLY_GAS,
            CallPath::Transaction => TRANSACTION_GAS,
        }
    }
}

/// 32-byte block hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CryptoHash(pub [u8; 32]);

impl FromStr for CryptoHash {
    type Err = GatewayError;

    fn from_str(encoded: &str) -> Result<Self> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| GatewayError::InvalidViewResult(format!("block hash is not base58: {}", e)))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            GatewayError::InvalidViewResult(format!("block hash has {} bytes, expected 32", bytes.len()))
        })?;
        Ok(Self(hash))
    }
}

impl fmt::Display for CryptoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

/// Latest block the transaction is anchored to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReference {
    /// Decoded block hash
    pub hash: CryptoHash,
    /// Block height
    pub height: u64,
}

/// Serialize an integer as its decimal string, the way the ledger's JSON
/// encodes u64/u128 amounts.
pub(crate) fn as_decimal_string<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Serialize bytes as an index-keyed object (`{"0": 12, "1": 250, ...}`),
/// matching how signer wallets receive `Uint8Array` fields over JSON.
pub(crate) fn as_indexed_bytes<S>(hash: &CryptoHash, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(hash.0.len()))?;
    for (index, byte) in hash.0.iter().enumerate() {
        map.serialize_entry(&index.to_string(), byte)?;
    }
    map.end()
}

/// Byte buffer in the `{"type": "Buffer", "data": [...]}` shape
#[derive(Debug, Serialize)]
pub(crate) struct BufferView<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: &'a [u8],
}

impl<'a> BufferView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { kind: "Buffer", data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_hash_base58_round_trip() {
        let hash = CryptoHash([7u8; 32]);
        let encoded = hash.to_string();
        assert_eq!(encoded.parse::<CryptoHash>().unwrap(), hash);
    }

    #[test]
    fn test_crypto_hash_rejects_wrong_length() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(
            short.parse::<CryptoHash>(),
            Err(GatewayError::InvalidViewResult(_))
        ));
        assert!("0OIl".parse::<CryptoHash>().is_err());
    }

    #[test]
    fn test_call_path_gas() {
        assert_eq!(CallPath::ViewOnly.gas(), 50_000_000_000_000);
        assert_eq!(CallPath::Transaction.gas(), 200_000_000_000_000);
    }
}

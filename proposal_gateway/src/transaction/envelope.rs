//! Unsigned transaction assembly

use super::action::Action;
use super::types::{as_decimal_string, as_indexed_bytes, BlockReference, CryptoHash, Nonce, SignerIdentity};
use serde::Serialize;

/// Unsigned transaction ready for an external signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEnvelope {
    signer_id: String,
    public_key: String,
    #[serde(serialize_with = "as_decimal_string")]
    nonce: Nonce,
    receiver_id: String,
    actions: Vec<Action>,
    #[serde(serialize_with = "as_indexed_bytes")]
    block_hash: CryptoHash,
}

impl TransactionEnvelope {
    pub fn signer_id(&self) -> &str {
        &self.signer_id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    /// Actions in execution order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn block_hash(&self) -> &CryptoHash {
        &self.block_hash
    }
}

/// Combine the signer, receiver, actions, nonce and block reference.
///
/// Nonce and block freshness are the caller's responsibility; the action
/// order is kept exactly as given.
pub fn assemble(
    signer: &SignerIdentity,
    receiver_id: impl Into<String>,
    actions: Vec<Action>,
    nonce: Nonce,
    block: &BlockReference,
) -> TransactionEnvelope {
    TransactionEnvelope {
        signer_id: signer.account_id.clone(),
        public_key: signer.public_key.clone(),
        nonce,
        receiver_id: receiver_id.into(),
        actions,
        block_hash: block.hash,
    }
}

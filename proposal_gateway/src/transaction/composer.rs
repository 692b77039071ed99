//! Fetch the nonce and block reference, then assemble the envelope

use super::action::Action;
use super::envelope::{assemble, TransactionEnvelope};
use super::types::SignerIdentity;
use crate::common::{GatewayError, Result};
use crate::ledger::LedgerQuery;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Builds envelopes from fresh ledger state
pub struct TransactionComposer {
    ledger: Arc<dyn LedgerQuery>,
}

impl TransactionComposer {
    pub fn new(ledger: Arc<dyn LedgerQuery>) -> Self {
        Self { ledger }
    }

    /// Query the nonce and the latest block concurrently and assemble.
    ///
    /// Both queries run on every call; nothing is cached. The first failing
    /// query fails the whole composition, and `cancel` or `deadline` stop it
    /// before either result is used.
    pub async fn compose(
        &self,
        signer: &SignerIdentity,
        receiver_id: &str,
        actions: Vec<Action>,
        cancel: &CancellationToken,
        deadline: Option<Duration>,
    ) -> Result<TransactionEnvelope> {
        let queries = async {
            tokio::try_join!(
                self.ledger.fetch_nonce(&signer.account_id, &signer.public_key),
                self.ledger.fetch_latest_block(),
            )
        };
        let bounded = async {
            match deadline {
                Some(limit) => match tokio::time::timeout(limit, queries).await {
                    Ok(joined) => joined,
                    Err(_) => Err(GatewayError::DeadlineExceeded(limit)),
                },
                None => queries.await,
            }
        };

        let (nonce, block) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            joined = bounded => joined?,
        };

        debug!(
            "composing {} action(s) for {} at nonce {} block {}",
            actions.len(),
            receiver_id,
            nonce,
            block.height
        );
        Ok(assemble(signer, receiver_id, actions, nonce, &block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{encode_function_call, BlockReference, CryptoHash, Nonce};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLedger {
        nonce: Option<Nonce>,
        hash: CryptoHash,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LedgerQuery for FixedLedger {
        async fn fetch_nonce(&self, account_id: &str, public_key: &str) -> Result<Nonce> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.nonce.ok_or_else(|| GatewayError::AccountOrKeyNotFound {
                account_id: account_id.to_string(),
                public_key: public_key.to_string(),
            })
        }

        async fn fetch_latest_block(&self) -> Result<BlockReference> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(BlockReference {
                hash: self.hash,
                height: 10,
            })
        }

        async fn call_view(&self, _: &str, _: &str, _: &str) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    struct StalledLedger;

    #[async_trait]
    impl LedgerQuery for StalledLedger {
        async fn fetch_nonce(&self, _: &str, _: &str) -> Result<Nonce> {
            std::future::pending().await
        }

        async fn fetch_latest_block(&self) -> Result<BlockReference> {
            std::future::pending().await
        }

        async fn call_view(&self, _: &str, _: &str, _: &str) -> Result<Value> {
            std::future::pending().await
        }
    }

    fn signer() -> SignerIdentity {
        SignerIdentity::new("agent.near", "ed25519:6E8sCci9badyRkXb3JoRpBj5p8C6Tw41ELDZoiihKEtp")
    }

    fn action() -> Action {
        encode_function_call("add_proposal", &json!({"labels": []}), 1, 0).unwrap()
    }

    #[tokio::test]
    async fn test_compose_carries_fetched_nonce_and_hash() {
        let ledger = Arc::new(FixedLedger {
            nonce: Some(77),
            hash: CryptoHash([3u8; 32]),
            calls: AtomicUsize::new(0),
        });
        let composer = TransactionComposer::new(ledger.clone());

        let envelope = composer
            .compose(&signer(), "devhub.near", vec![action()], &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(envelope.nonce(), 77);
        assert_eq!(envelope.block_hash(), &CryptoHash([3u8; 32]));
        assert_eq!(envelope.signer_id(), "agent.near");

        composer
            .compose(&signer(), "devhub.near", vec![action()], &CancellationToken::new(), None)
            .await
            .unwrap();
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_compose_fails_without_access_key() {
        let composer = TransactionComposer::new(Arc::new(FixedLedger {
            nonce: None,
            hash: CryptoHash::default(),
            calls: AtomicUsize::new(0),
        }));

        let result = composer
            .compose(&signer(), "devhub.near", vec![action()], &CancellationToken::new(), None)
            .await;

        assert!(matches!(result, Err(GatewayError::AccountOrKeyNotFound { .. })));
    }

    #[tokio::test]
    async fn test_compose_cancelled() {
        let composer = TransactionComposer::new(Arc::new(StalledLedger));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = composer
            .compose(&signer(), "devhub.near", vec![action()], &cancel, None)
            .await;

        assert!(matches!(result, Err(GatewayError::Cancelled)));
    }

    #[tokio::test]
    async fn test_compose_deadline() {
        let composer = TransactionComposer::new(Arc::new(StalledLedger));

        let result = composer
            .compose(
                &signer(),
                "devhub.near",
                vec![action()],
                &CancellationToken::new(),
                Some(Duration::from_millis(20)),
            )
            .await;

        assert!(matches!(result, Err(GatewayError::DeadlineExceeded(_))));
    }
}

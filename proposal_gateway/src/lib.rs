//! Proposal gateway
//!
//! Turns proposal and project descriptions into unsigned NEAR transactions
//! for an external signer. Builders are pure; the composer adds a fresh nonce
//! and block reference from the ledger RPC.

pub mod ai_services;
pub mod api;
pub mod catalog;
pub mod common;
pub mod config;
pub mod governance;
pub mod ledger;
pub mod transaction;
pub mod utils;

pub use common::{GatewayError, Result};

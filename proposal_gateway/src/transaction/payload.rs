use super::action::{encode_function_call, Action};
use super::types::as_decimal_string;
use crate::common::Result;
use serde::Serialize;

/// Contract call description returned when no signing step is scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallPayload<A> {
    pub method_name: String,
    pub args: A,
    #[serde(serialize_with = "as_decimal_string")]
    pub gas: u64,
    #[serde(serialize_with = "as_decimal_string")]
    pub deposit: u128,
    pub contract_name: String,
}

impl<A: Serialize> FunctionCallPayload<A> {
    /// Encode this call as a transaction action
    pub fn to_action(&self) -> Result<Action> {
        encode_function_call(self.method_name.as_str(), &self.args, self.gas, self.deposit)
    }
}

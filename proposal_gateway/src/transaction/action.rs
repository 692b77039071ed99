//! Function-call action encoding

use super::types::{as_decimal_string, BufferView};
use crate::common::{GatewayError, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One executable step of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

/// Contract method invocation with pre-serialized arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallAction {
    /// Contract method name
    pub method_name: String,
    /// UTF-8 JSON of the argument object
    pub args: Vec<u8>,
    /// Attached gas
    pub gas: u64,
    /// Attached deposit in yoctoNEAR
    pub deposit: u128,
}

/// Encode a function call action.
///
/// Arguments are serialized to JSON exactly once, so the byte sequence
/// follows the key order of `args`: declaration order for structs and
/// insertion order for `serde_json` objects.
pub fn encode_function_call<A>(method_name: impl Into<String>, args: &A, gas: u64, deposit: u128) -> Result<Action>
where
    A: Serialize + ?Sized,
{
    let method_name = method_name.into();
    let args = serde_json::to_vec(args)
        .map_err(|e| GatewayError::malformed("args", format!("cannot encode arguments for {}: {}", method_name, e)))?;

    Ok(Action::FunctionCall(FunctionCallAction {
        method_name,
        args,
        gas,
        deposit,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCallView<'a> {
    method_name: &'a str,
    args: BufferView<'a>,
    #[serde(serialize_with = "as_decimal_string")]
    gas: u64,
    #[serde(serialize_with = "as_decimal_string")]
    deposit: u128,
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Action::FunctionCall(call) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(
                    "functionCall",
                    &FunctionCallView {
                        method_name: &call.method_name,
                        args: BufferView::new(&call.args),
                        gas: call.gas,
                        deposit: call.deposit,
                    },
                )?;
                map.serialize_entry("enum", "functionCall")?;
                map.end()
            }
        }
    }
}

pub mod action;
pub mod composer;
pub mod envelope;
pub mod payload;
pub mod types;

// Re-export commonly used types
pub use action::{encode_function_call, Action, FunctionCallAction};
pub use composer::TransactionComposer;
pub use envelope::{assemble, TransactionEnvelope};
pub use payload::FunctionCallPayload;
pub use types::*;

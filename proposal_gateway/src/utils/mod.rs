pub mod encoding;

pub use encoding::{decode_component, decode_optional};

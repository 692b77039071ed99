//! Percent-decoding of URL path segments

use crate::common::{GatewayError, Result};

/// Decode one percent-encoded request field.
///
/// `%` must be followed by two hex digits and the decoded bytes must be
/// valid UTF-8; anything else is reported against `field`.
pub fn decode_component(field: &str, raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.map_or(false, |e| e.iter().all(u8::is_ascii_hexdigit)) {
                return Err(GatewayError::malformed(
                    field,
                    format!("invalid percent escape at byte {}", i),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| GatewayError::malformed(field, format!("not UTF-8 after decoding: {}", e)))
}

/// Decode an optional field, mapping a missing or empty result to `None`
pub fn decode_optional(field: &str, raw: Option<&str>) -> Result<Option<String>> {
    match raw {
        Some(raw) => {
            let decoded = decode_component(field, raw)?;
            Ok((!decoded.is_empty()).then_some(decoded))
        }
        None => Ok(None),
    }
}

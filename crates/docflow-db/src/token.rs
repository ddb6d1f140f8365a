//! Opaque continuation tokens for paginated listing.
//!
//! A token encodes the row offset of the next page. Callers treat it as
//! opaque and pass it back unmodified.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use docflow_core::AppError;

pub fn encode_offset(offset: i64) -> String {
    URL_SAFE_NO_PAD.encode(offset.to_string())
}

pub fn decode_offset(token: &str) -> Result<i64, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| AppError::InvalidInput("malformed continuation token".to_string()))?;
    let raw = std::str::from_utf8(&bytes)
        .map_err(|_| AppError::InvalidInput("malformed continuation token".to_string()))?;
    let offset: i64 = raw
        .parse()
        .map_err(|_| AppError::InvalidInput("malformed continuation token".to_string()))?;
    if offset < 0 {
        return Err(AppError::InvalidInput(
            "malformed continuation token".to_string(),
        ));
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        for offset in [0, 1, 50, 12_345] {
            assert_eq!(decode_offset(&encode_offset(offset)).unwrap(), offset);
        }
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        assert!(decode_offset("!!!not-base64!!!").is_err());
        assert!(decode_offset(&URL_SAFE_NO_PAD.encode("minus-one")).is_err());
        assert!(decode_offset(&URL_SAFE_NO_PAD.encode("-5")).is_err());
    }
}

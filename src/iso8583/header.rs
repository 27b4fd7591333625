use crate::iso8583::IsoError;

/// Number of characters in a message type indicator
pub const MTI_LEN: usize = 4;

/// Checks that the (already trimmed) message isn't empty and returns the MTI
/// from its first 4 characters
pub fn validate(raw: &str) -> Result<&str, IsoError> {
    if raw.is_empty() {
        return Err(IsoError::EmptyMessage);
    }

    // offsets are in characters, the message may carry non-ascii field data
    let end = match raw.char_indices().nth(MTI_LEN) {
        Some((idx, _)) => idx,
        None if raw.chars().count() == MTI_LEN => raw.len(),
        None => return Err(IsoError::InvalidMti),
    };

    Ok(&raw[..end])
}

#[test]
fn test_validate() {
    assert_eq!(Ok("0800"), validate("0800823A000020000000"));
    assert_eq!(Ok("1100"), validate("1100"));
    assert_eq!(Ok("ÉÉÉÉ"), validate("ÉÉÉÉ001"));
}

#[test]
fn test_validate_rejects() {
    assert_eq!(Err(IsoError::EmptyMessage), validate(""));
    assert_eq!(Err(IsoError::InvalidMti), validate("12"));
    assert_eq!(Err(IsoError::InvalidMti), validate("080"));
}

use base64::{engine::general_purpose::STANDARD, Engine};

/// Why a credential header could not be decoded. Callers collapse every
/// variant to the same 401 response; the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// Header absent or scheme is not `Basic`.
    MissingScheme,
    /// Payload is not base64, not UTF-8, or lacks the `:` separator.
    Malformed,
}

/// Decode a `Basic <base64(email:password)>` header value into its parts.
/// Pure function, unit-testable without any HTTP machinery.
pub fn decode_basic(header: &str) -> Result<(String, String), CredentialError> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(CredentialError::MissingScheme)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CredentialError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::Malformed)?;

    let (email, password) = decoded.split_once(':').ok_or(CredentialError::Malformed)?;
    Ok((email.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn decodes_email_and_password() {
        let (email, password) = decode_basic(&encode("a@b.com:Str0ngPass")).unwrap();
        assert_eq!(email, "a@b.com");
        assert_eq!(password, "Str0ngPass");
    }

    #[test]
    fn password_may_contain_colons() {
        let (email, password) = decode_basic(&encode("a@b.com:pa:ss:word")).unwrap();
        assert_eq!(email, "a@b.com");
        assert_eq!(password, "pa:ss:word");
    }

    #[test]
    fn rejects_wrong_scheme() {
        assert_eq!(
            decode_basic("Bearer abcdef"),
            Err(CredentialError::MissingScheme)
        );
        assert_eq!(decode_basic(""), Err(CredentialError::MissingScheme));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(
            decode_basic("Basic !!!not-base64!!!"),
            Err(CredentialError::Malformed)
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            decode_basic(&encode("no-colon-here")),
            Err(CredentialError::Malformed)
        );
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let header = format!("Basic {}", STANDARD.encode([0xff, 0xfe, 0x3a, 0xff]));
        assert_eq!(decode_basic(&header), Err(CredentialError::Malformed));
    }
}

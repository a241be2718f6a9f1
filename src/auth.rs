use base64::prelude::*;

/// Builds the credential part of a `Basic` authorization header (RFC 2617).
///
/// No validation is done on `key` or `secret`; empty values still encode and
/// are left for the API to reject.
pub fn create_authorization(key: &str, secret: &str) -> String {
    BASE64_STANDARD.encode(format!("{key}:{secret}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_key_and_secret() {
        assert_eq!(create_authorization("key", "secret"), "a2V5OnNlY3JldA==");
    }

    #[test]
    fn empty_credentials_still_encode() {
        assert_eq!(create_authorization("", ""), "Og==");
    }
}

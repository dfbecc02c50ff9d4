use sha2::{Digest, Sha512_256};

/// Derive the 4-byte selector of an ARC-4 method signature.
///
/// The selector is the first four bytes of the SHA-512/256 digest of
/// the signature string, hashed exactly as stored.
pub fn method_selector(signature: &str) -> [u8; 4] {
    let digest = Sha512_256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_the_digest_prefix() {
        let signature = "add(uint64,uint64)uint64";
        let digest = Sha512_256::digest(signature.as_bytes());
        assert_eq!(method_selector(signature).as_slice(), &digest[..4]);
    }

    #[test]
    fn distinct_signatures_get_distinct_selectors() {
        assert_ne!(
            method_selector("add(uint64,uint64)uint64"),
            method_selector("sub(uint64,uint64)uint64")
        );
    }

    #[test]
    fn quotes_change_the_selector() {
        // the signature is hashed as stored, so surrounding quotes are
        // part of the hashed input
        assert_ne!(
            method_selector(r#""add(uint64,uint64)uint64""#),
            method_selector("add(uint64,uint64)uint64")
        );
    }
}

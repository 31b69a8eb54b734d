use crate::error::NamingError;
use crate::strategy::NamingStrategy;

/// Names payloads by the lowercase hex BLAKE3 digest of their bytes.
///
/// An optional domain tag is prepended to the hashed input. Facades that share
/// a container but store different flavors of payload can use distinct tags so
/// identical bytes written by each do not collapse onto one object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentHashNaming {
    domain: Option<&'static str>,
}

impl ContentHashNaming {
    /// Plain digest of the payload, no domain tag.
    pub const fn new() -> Self {
        Self { domain: None }
    }

    /// Digest domain-separated by `domain`.
    pub const fn with_domain(domain: &'static str) -> Self {
        Self {
            domain: Some(domain),
        }
    }

    /// Hex digest of `payload` under this strategy's domain.
    pub fn digest_hex(&self, payload: &[u8]) -> String {
        let mut hasher = blake3::Hasher::new();
        if let Some(domain) = self.domain {
            hasher.update(domain.as_bytes());
            hasher.update(b":");
        }
        hasher.update(payload);
        hex::encode(hasher.finalize().as_bytes())
    }

    /// The domain tag, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain
    }
}

impl NamingStrategy for ContentHashNaming {
    fn name_for(&self, payload: &[u8]) -> Result<String, NamingError> {
        Ok(self.digest_hex(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_is_deterministic() {
        let naming = ContentHashNaming::new();
        assert_eq!(naming.name_for(b"hi").unwrap(), naming.name_for(b"hi").unwrap());
    }

    #[test]
    fn name_is_lowercase_hex_of_blake3() {
        let name = ContentHashNaming::new().name_for(b"hello world").unwrap();
        assert_eq!(name, blake3::hash(b"hello world").to_hex().to_string());
        assert_eq!(name.len(), 64);
        assert!(name.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn empty_payload_has_a_name() {
        let name = ContentHashNaming::new().name_for(b"").unwrap();
        assert_eq!(name.len(), 64);
    }

    #[test]
    fn domains_separate_identical_payloads() {
        let plain = ContentHashNaming::new().name_for(b"same").unwrap();
        let json = ContentHashNaming::with_domain("json").name_for(b"same").unwrap();
        let csv = ContentHashNaming::with_domain("csv").name_for(b"same").unwrap();
        assert_ne!(plain, json);
        assert_ne!(json, csv);
    }

    proptest! {
        #[test]
        fn identical_payloads_share_a_name(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let naming = ContentHashNaming::new();
            prop_assert_eq!(naming.name_for(&payload).unwrap(), naming.name_for(&payload.clone()).unwrap());
        }

        #[test]
        fn distinct_payloads_get_distinct_names(
            a in proptest::collection::vec(any::<u8>(), 0..256),
            b in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            prop_assume!(a != b);
            let naming = ContentHashNaming::new();
            prop_assert_ne!(naming.name_for(&a).unwrap(), naming.name_for(&b).unwrap());
        }
    }
}

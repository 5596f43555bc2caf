use crate::core::types::{HashedTokenValue, TokenValue};

pub trait HashTo: AsRef<str> {
    type HashedType;
}

impl HashTo for TokenValue {
    type HashedType = HashedTokenValue;
}

/// Derives the lookup representation of presented secrets.
#[derive(Debug, Clone, Default)]
pub struct HashingService;

impl HashingService {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic SHA-512 digest, URL-safe base64 encoded, so that stored tokens can be
    /// found by value without keeping the value.
    pub fn hash_without_salt<T, H>(&self, to_hash: &T) -> H
    where
        T: HashTo<HashedType = H>,
        H: From<String>,
    {
        use sha2::Digest;

        let to_hash = to_hash.as_ref();
        let digest = sha2::Sha512::digest(to_hash.as_bytes());
        let hash = base64::encode_config(digest, base64::URL_SAFE);
        hash.into()
    }
}

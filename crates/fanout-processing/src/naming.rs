//! Filename tokens
//!
//! Every accepted file gets one random base name `<64 hex>.<ext>`, shared by its four
//! variant tiers. The token is an HMAC-SHA256 over fresh random bytes and the current
//! time, so names are unguessable without the key and do not repeat in practice.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of the hex token
pub const TOKEN_LEN: usize = 64;

#[derive(Clone)]
pub struct FilenameGenerator {
    mac: HmacSha256,
}

impl std::fmt::Debug for FilenameGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilenameGenerator").finish_non_exhaustive()
    }
}

impl FilenameGenerator {
    pub fn new(key: &[u8]) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| anyhow::anyhow!("invalid filename key: {}", e))?;
        Ok(Self { mac })
    }

    pub fn token(&self) -> String {
        let nonce: [u8; 16] = rand::random();
        let now = chrono::Utc::now();

        let mut mac = self.mac.clone();
        mac.update(&nonce);
        mac.update(&now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Base filename for one uploaded file.
    pub fn generate(&self, original_name: &str, content_type: &str) -> String {
        format!("{}.{}", self.token(), extension_for(original_name, content_type))
    }
}

/// Lowercased extension of the original name with spaces removed. Names without a usable
/// extension fall back to the declared type.
pub fn extension_for(original_name: &str, content_type: &str) -> String {
    let cleaned: String = original_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    match cleaned.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_string()
        }
        _ => extension_from_mime(content_type).to_string(),
    }
}

fn extension_from_mime(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generator() -> FilenameGenerator {
        FilenameGenerator::new(b"test-secret").unwrap()
    }

    fn assert_shape(name: &str, ext: &str) {
        let (token, actual_ext) = name.split_once('.').unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(actual_ext, ext);
    }

    #[test]
    fn test_generated_name_shape() {
        let generator = generator();
        assert_shape(&generator.generate("Holiday Photo.JPG", "image/jpeg"), "jpg");
        assert_shape(&generator.generate("a.b.PNG", "image/png"), "png");
        assert_shape(&generator.generate("pic.We bP", "image/webp"), "webp");
    }

    #[test]
    fn test_extension_fallback_to_mime() {
        assert_eq!(extension_for("no_extension", "image/png"), "png");
        assert_eq!(extension_for("trailing.", "image/jpeg"), "jpg");
        assert_eq!(extension_for("weird.ex/t", "image/webp"), "webp");
        assert_eq!(extension_for("", "text/plain"), "bin");
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let generator = generator();
        let tokens: HashSet<String> = (0..10_000).map(|_| generator.token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", generator());
        assert!(!debug.contains("test-secret"));
    }
}

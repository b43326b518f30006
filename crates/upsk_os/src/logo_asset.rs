#![forbid(unsafe_code)]

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use upsk_contracts::logo::LogoAsset;
use upsk_contracts::ContractViolation;

/// Builds a base64 data URI the way a browser file reader does.
pub fn data_uri_from_bytes(media_type: &str, bytes: &[u8]) -> Result<LogoAsset, ContractViolation> {
    LogoAsset::from_data_uri(format!("data:{media_type};base64,{}", BASE64.encode(bytes)))
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Short SHA-256 of the full data URI, used in log lines instead of the payload.
pub fn fingerprint(logo: &LogoAsset) -> String {
    let digest = Sha256::digest(logo.as_str().as_bytes());
    digest
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Size of the decoded payload, when the logo is a base64 data URI.
pub fn decoded_len(logo: &LogoAsset) -> Option<usize> {
    if !logo.is_base64() {
        return None;
    }
    BASE64.decode(logo.payload().trim()).ok().map(|bytes| bytes.len())
}

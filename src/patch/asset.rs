use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::error::{PagewrightError, PagewrightResult};

/// Token a rule payload carries where the inline asset text goes.
pub const ASSET_SLOT: &str = "__PAGEWRIGHT_ASSET_BASE64__";

/// What the slot holds when no asset was supplied. The page script reads an empty data URI body
/// as "audio disabled".
pub const EMPTY_ASSET_MARKER: &str = "";

/// External binary asset to inline into the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetPayload {
    /// Raw bytes, base64-encoded on embedding.
    Bytes(Vec<u8>),
    /// Text that is already base64 (whitespace removed, validated).
    Encoded(String),
}

impl AssetPayload {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Accept pre-encoded base64 text, e.g. the output of `base64 file.mp3`.
    ///
    /// Line breaks and surrounding whitespace are dropped; anything else that is not base64 is an
    /// error.
    pub fn from_encoded_text(text: &str) -> PagewrightResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if !compact.is_empty() {
            BASE64
                .decode(compact.as_bytes())
                .map_err(|e| PagewrightError::asset(format!("asset text is not base64: {e}")))?;
        }
        Ok(Self::Encoded(compact))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(b) => b.is_empty(),
            Self::Encoded(s) => s.is_empty(),
        }
    }

    /// Inline-safe text for this asset (standard alphabet, padded).
    pub fn inline_text(&self) -> String {
        match self {
            Self::Bytes(b) => BASE64.encode(b),
            Self::Encoded(s) => s.clone(),
        }
    }

    /// Length of [`Self::inline_text`] without encoding anything.
    pub fn inline_len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len().div_ceil(3) * 4,
            Self::Encoded(s) => s.len(),
        }
    }
}

/// Value substituted into [`ASSET_SLOT`].
pub fn slot_value(asset: Option<&AssetPayload>) -> String {
    match asset {
        Some(a) if !a.is_empty() => a.inline_text(),
        _ => EMPTY_ASSET_MARKER.to_string(),
    }
}

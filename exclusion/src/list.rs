//! Exclusion-list wire format: parsing and signature verification.
//!
//! A source publishes a JSON document carrying its entries plus a detached
//! signature block. The signature does not cover the raw JSON bytes; it
//! covers a canonical message rebuilt from the parsed fields, so whitespace
//! and key ordering in the document cannot affect verification.

use serde::Deserialize;
use tracing::{trace, warn};

use meridian_crypto::verify_signature;
use meridian_types::{AccountId, KeyType, PublicKey};

use crate::config::ExclusionSource;

/// One excluded account, with the issuer's stated reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusionEntry {
    pub address: AccountId,
    pub reason: String,
    pub date_added: String,
}

/// A parsed exclusion list from one source.
///
/// `verified` is set only after the signature check passes; the fetcher's
/// per-source cache never holds an unverified list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusionList {
    pub version: String,
    pub timestamp: String,
    pub issuer_address: AccountId,
    pub entries: Vec<ExclusionEntry>,
    pub verified: bool,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    version: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    issuer_address: String,
    #[serde(default)]
    exclusions: Vec<RawEntry>,
    signature: Option<RawSignature>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    address: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    date_added: String,
}

#[derive(Deserialize)]
struct RawSignature {
    #[serde(default)]
    algorithm: String,
    #[serde(default)]
    public_key: String,
    #[serde(default)]
    signature: String,
}

/// Parse one source's response body into an [`ExclusionList`].
///
/// Entries with an unparseable address are skipped individually; a document
/// that is not valid JSON, has the wrong shape, or carries an invalid issuer
/// address fails as a whole. The returned list is not yet verified.
pub fn parse_exclusion_list(content: &str) -> Option<ExclusionList> {
    let raw: RawDocument = match serde_json::from_str(content) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(%err, "failed to parse exclusion list JSON");
            return None;
        }
    };

    let issuer_address = if raw.issuer_address.is_empty() {
        AccountId::ZERO
    } else {
        match AccountId::from_hex(&raw.issuer_address) {
            Ok(id) => id,
            Err(_) => {
                warn!(issuer = %raw.issuer_address, "invalid issuer address");
                return None;
            }
        }
    };

    let mut entries = Vec::with_capacity(raw.exclusions.len());
    for entry in raw.exclusions {
        let Ok(address) = AccountId::from_hex(&entry.address) else {
            warn!(address = %entry.address, "skipping entry with invalid address");
            continue;
        };
        entries.push(ExclusionEntry {
            address,
            reason: entry.reason,
            date_added: entry.date_added,
        });
    }

    Some(ExclusionList {
        version: raw.version,
        timestamp: raw.timestamp,
        issuer_address,
        entries,
        verified: false,
    })
}

/// Build the canonical message a source signs.
///
/// Format: `v1:<version>:<timestamp>:<issuer-hex>:` followed by the entry
/// addresses in hex, sorted lexicographically, each terminated by a newline.
pub fn canonical_message(list: &ExclusionList) -> String {
    let mut addresses: Vec<String> =
        list.entries.iter().map(|e| e.address.to_hex()).collect();
    addresses.sort();

    let mut message = format!(
        "v1:{}:{}:{}:",
        list.version,
        list.timestamp,
        list.issuer_address.to_hex()
    );
    for address in &addresses {
        message.push_str(address);
        message.push('\n');
    }
    message
}

/// Verify a parsed list against its source's configured key.
///
/// The document's declared key must equal the configured key and its
/// declared algorithm must match the configured key type; any mismatch is an
/// authentication failure. Returns `false` on every failure path.
pub fn verify_list(list: &ExclusionList, raw_content: &str, source: &ExclusionSource) -> bool {
    let raw: RawDocument = match serde_json::from_str(raw_content) {
        Ok(raw) => raw,
        Err(_) => return false,
    };
    let Some(sig) = raw.signature else {
        trace!(url = %source.url, "exclusion list carries no signature block");
        return false;
    };

    if sig.public_key != source.public_key {
        warn!(url = %source.url, "signature public key does not match configured key");
        return false;
    }
    if KeyType::from_str_opt(&sig.algorithm) != Some(source.key_type) {
        warn!(
            url = %source.url,
            algorithm = %sig.algorithm,
            "signature algorithm does not match configured key type"
        );
        return false;
    }

    let Ok(key) = PublicKey::from_hex(source.key_type, &source.public_key) else {
        warn!(url = %source.url, "configured public key is not valid hex");
        return false;
    };

    let message = canonical_message(list);
    verify_signature(message.as_bytes(), &sig.signature, &key)
}

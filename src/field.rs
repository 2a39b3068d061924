//! Field codec for text-stored IP values
//!
//! The inventory database stores IP addresses and networks as canonical text
//! in plain `VARCHAR` columns, since SQLite has no INET column type. This
//! module adapts the [`crate::ip`] value type to that "stored as text"
//! contract: decode on load, encode on save, validate user input at the edit
//! boundary, and prepare canonical text for storage-level equality lookups.
//!
//! Two field kinds share this structure and differ only in the accepted shape:
//!
//! - [`FieldKind::Address`] holds a bare host address (`VARCHAR(42)`);
//! - [`FieldKind::Network`] holds a CIDR network (`VARCHAR(45)`); a bare
//!   address is accepted and widened to a full-width host network.
//!
//! Decode is deliberately asymmetric: the address kind never fails, passing
//! unparsable legacy text through as [`FieldValue::Raw`], while the network
//! kind fails with [`DecodeError`]. Stored data predating validation depends
//! on the permissive path, so it is preserved rather than unified.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ip::IpValue;

// =============================================================================
// Errors
// =============================================================================

/// Strict decode failure (network-kind fields only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode '{input}' as {kind} field value: {reason}")]
pub struct DecodeError {
    pub kind: FieldKind,
    pub input: String,
    pub reason: String,
}

/// User-input validation failure at the edit boundary
///
/// Carries the original parse failure reason so it can be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub reason: String,
}

// =============================================================================
// Field kinds and values
// =============================================================================

/// The two IP field kinds supported by the inventory schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A single host address column
    Address,
    /// A CIDR network column
    Network,
}

/// Decoded view of one persisted text column
///
/// Re-derived on every read and discarded after use; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Empty column (stored as empty text, or the literal `"None"` left
    /// behind by earlier storage round-trips)
    Null,
    Address(IpAddr),
    Network(IpNet),
    /// Unparsable legacy text preserved verbatim (address kind only)
    Raw(String),
}

/// Single-line text widget configuration for editing a field
///
/// Each field kind carries its own widget default; see [`FieldKind::widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetSpec {
    /// Visible input size in characters, matching the column width
    pub size: usize,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Address => write!(f, "address"),
            FieldKind::Network => write!(f, "network"),
        }
    }
}

impl FieldValue {
    /// Canonical text for storage: `Null` encodes to empty text, addresses
    /// and networks render canonically, raw legacy text passes through.
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Address(addr) => addr.to_string(),
            FieldValue::Network(net) => net.to_string(),
            FieldValue::Raw(text) => text.clone(),
        }
    }

    /// The decoded IP value, if this is one
    pub fn as_ip_value(&self) -> Option<IpValue> {
        match self {
            FieldValue::Address(addr) => Some(IpValue::Address(*addr)),
            FieldValue::Network(net) => Some(IpValue::Network(*net)),
            FieldValue::Null | FieldValue::Raw(_) => None,
        }
    }
}

impl FieldKind {
    /// SQL column type holding the longest canonical literal of this kind
    pub fn column_type(&self) -> &'static str {
        match self {
            FieldKind::Address => "VARCHAR(42)",
            FieldKind::Network => "VARCHAR(45)",
        }
    }

    /// Maximum canonical literal length in bytes
    pub fn column_width(&self) -> usize {
        match self {
            FieldKind::Address => 42,
            FieldKind::Network => 45,
        }
    }

    /// Default edit widget for this field kind
    pub fn widget(&self) -> WidgetSpec {
        WidgetSpec {
            size: self.column_width(),
        }
    }

    /// Decode one stored text column into its field value
    ///
    /// Empty text and the literal `"None"` decode to [`FieldValue::Null`] for
    /// both kinds. The address kind never fails; see the module docs for the
    /// permissive/strict asymmetry.
    pub fn decode(&self, raw: &str) -> Result<FieldValue, DecodeError> {
        if raw.is_empty() || raw == "None" {
            return Ok(FieldValue::Null);
        }
        match self {
            FieldKind::Address => match IpAddr::from_str(raw) {
                Ok(addr) => Ok(FieldValue::Address(addr)),
                // legacy rows may hold anything; pass the text through
                Err(_) => Ok(FieldValue::Raw(raw.to_string())),
            },
            FieldKind::Network => match raw.parse::<IpValue>() {
                // a bare address is a single-address network
                Ok(value) => Ok(FieldValue::Network(value.as_network())),
                Err(e) => Err(DecodeError {
                    kind: *self,
                    input: raw.to_string(),
                    reason: e.reason,
                }),
            },
        }
    }

    /// Validate user-supplied text before it is encoded for storage
    pub fn validate(&self, raw: &str) -> Result<(), ValidationError> {
        if raw.is_empty() || raw == "None" {
            return Ok(());
        }
        match self {
            FieldKind::Address => IpAddr::from_str(raw).map(|_| ()).map_err(|e| {
                ValidationError {
                    reason: format!("'{}' is not a valid IP address: {}", raw, e),
                }
            }),
            FieldKind::Network => raw
                .parse::<IpValue>()
                .map(|_| ())
                .map_err(|e| ValidationError {
                    reason: e.to_string(),
                }),
        }
    }

    /// Validate and canonicalize user-supplied text in one step
    ///
    /// This is what repositories run on insert, so that columns only ever
    /// hold canonical text going forward.
    pub fn canonicalize(&self, raw: &str) -> Result<String, ValidationError> {
        self.validate(raw)?;
        let value = self.decode(raw).map_err(|e| ValidationError {
            reason: e.to_string(),
        })?;
        Ok(value.encode())
    }

    /// Canonical text for a storage-level equality lookup
    pub fn prep_exact(&self, value: &FieldValue) -> String {
        value.encode()
    }

    /// Canonical text for each candidate of a storage-level `IN` lookup
    ///
    /// Equality and membership are the only comparisons storage can answer on
    /// these columns; containment goes through [`crate::filters`] instead.
    pub fn prep_in(&self, values: &[FieldValue]) -> Vec<String> {
        values.iter().map(FieldValue::encode).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_null_forms() {
        for kind in [FieldKind::Address, FieldKind::Network] {
            assert_eq!(kind.decode("").unwrap(), FieldValue::Null);
            assert_eq!(kind.decode("None").unwrap(), FieldValue::Null);
        }
    }

    #[test]
    fn test_address_decode() {
        let kind = FieldKind::Address;
        assert_eq!(
            kind.decode("10.0.0.5").unwrap(),
            FieldValue::Address("10.0.0.5".parse().unwrap())
        );
        assert_eq!(
            kind.decode("2001:db8::1").unwrap(),
            FieldValue::Address("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn test_address_decode_is_permissive() {
        let kind = FieldKind::Address;
        // malformed legacy data passes through unchanged
        assert_eq!(
            kind.decode("not-an-ip").unwrap(),
            FieldValue::Raw("not-an-ip".to_string())
        );
        // a network literal is not a valid bare address
        assert_eq!(
            kind.decode("10.0.0.0/24").unwrap(),
            FieldValue::Raw("10.0.0.0/24".to_string())
        );
    }

    #[test]
    fn test_network_decode() {
        let kind = FieldKind::Network;
        assert_eq!(
            kind.decode("10.0.0.0/24").unwrap(),
            FieldValue::Network("10.0.0.0/24".parse().unwrap())
        );
        // bare address widens to a host network
        assert_eq!(
            kind.decode("10.0.0.5").unwrap(),
            FieldValue::Network("10.0.0.5/32".parse().unwrap())
        );
        assert_eq!(
            kind.decode("2001:db8::1").unwrap(),
            FieldValue::Network("2001:db8::1/128".parse().unwrap())
        );
    }

    #[test]
    fn test_network_decode_is_strict() {
        let err = FieldKind::Network.decode("not-an-ip").unwrap_err();
        assert_eq!(err.input, "not-an-ip");
        assert_eq!(err.kind, FieldKind::Network);
    }

    #[test]
    fn test_encode_decode_idempotent() {
        let cases = [
            (FieldKind::Address, FieldValue::Null),
            (
                FieldKind::Address,
                FieldValue::Address("10.0.0.5".parse().unwrap()),
            ),
            (
                FieldKind::Address,
                FieldValue::Raw("not-an-ip".to_string()),
            ),
            (FieldKind::Network, FieldValue::Null),
            (
                FieldKind::Network,
                FieldValue::Network("10.0.0.0/24".parse().unwrap()),
            ),
        ];
        for (kind, value) in cases {
            assert_eq!(kind.decode(&value.encode()).unwrap(), value);
        }
    }

    #[test]
    fn test_encode_normalizes() {
        let value = FieldKind::Address.decode("2001:0DB8::0001").unwrap();
        assert_eq!(value.encode(), "2001:db8::1");
    }

    #[test]
    fn test_validate() {
        assert!(FieldKind::Address.validate("10.0.0.5").is_ok());
        assert!(FieldKind::Address.validate("").is_ok());
        let err = FieldKind::Address.validate("10.0.0.999").unwrap_err();
        assert!(err.reason.contains("10.0.0.999"));

        assert!(FieldKind::Network.validate("10.0.0.0/24").is_ok());
        assert!(FieldKind::Network.validate("10.0.0.0/33").is_err());
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(
            FieldKind::Network.canonicalize("2001:0db8::/32").unwrap(),
            "2001:db8::/32"
        );
        assert_eq!(
            FieldKind::Network.canonicalize("10.0.0.5").unwrap(),
            "10.0.0.5/32"
        );
        assert!(FieldKind::Address.canonicalize("10.000.0.1").is_err());
    }

    #[test]
    fn test_prep_lookups() {
        let kind = FieldKind::Address;
        let value = kind.decode("10.0.0.5").unwrap();
        assert_eq!(kind.prep_exact(&value), "10.0.0.5");

        let values = vec![
            kind.decode("10.0.0.5").unwrap(),
            kind.decode("2001:0db8::1").unwrap(),
            FieldValue::Null,
        ];
        assert_eq!(
            kind.prep_in(&values),
            vec!["10.0.0.5".to_string(), "2001:db8::1".to_string(), String::new()]
        );
    }

    #[test]
    fn test_column_contract() {
        assert_eq!(FieldKind::Address.column_type(), "VARCHAR(42)");
        assert_eq!(FieldKind::Network.column_type(), "VARCHAR(45)");
        assert_eq!(FieldKind::Address.widget().size, 42);
        assert_eq!(FieldKind::Network.widget().size, 45);
        // the longest canonical literals must fit
        assert!("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff".len() <= 42);
        assert!("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff/128".len() <= 45);
    }
}

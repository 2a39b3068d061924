//! IP value type
//!
//! This module provides the typed representation of a single IP address or a
//! CIDR network, shared by the field codec and the containment filter. Values
//! always render in canonical form: lowercase, no leading zeros, IPv6 with the
//! shortest `::` compression, networks as `address/prefix`.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failure to parse a textual IP address or network literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid IP address or network literal '{input}': {reason}")]
pub struct IpParseError {
    /// The offending input text
    pub input: String,
    /// Human-readable parse failure reason
    pub reason: String,
}

/// An address-family-gated operation was invoked on the wrong family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation is only defined for IPv4 addresses")]
pub struct UnsupportedFamily;

// =============================================================================
// Value type
// =============================================================================

/// A parsed IP value: either a single host address or a CIDR network
///
/// The variant is inferred from syntax when parsing: a `/<prefix>` suffix
/// selects [`IpValue::Network`], anything else is a bare [`IpValue::Address`].
/// A network keeps whatever host bits its literal carried (`10.0.0.5/24`
/// round-trips unchanged); containment is computed over the network bounds
/// regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpValue {
    Address(IpAddr),
    Network(IpNet),
}

impl FromStr for IpValue {
    type Err = IpParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('/') {
            IpNet::from_str(s)
                .map(IpValue::Network)
                .map_err(|e| IpParseError {
                    input: s.to_string(),
                    reason: e.to_string(),
                })
        } else {
            IpAddr::from_str(s)
                .map(IpValue::Address)
                .map_err(|e| IpParseError {
                    input: s.to_string(),
                    reason: e.to_string(),
                })
        }
    }
}

impl fmt::Display for IpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpValue::Address(addr) => addr.fmt(f),
            IpValue::Network(net) => net.fmt(f),
        }
    }
}

impl IpValue {
    /// Whether this value belongs to the IPv4 family
    pub fn is_ipv4(&self) -> bool {
        match self {
            IpValue::Address(addr) => addr.is_ipv4(),
            IpValue::Network(net) => matches!(net, IpNet::V4(_)),
        }
    }

    /// View this value as a network: addresses become full-width host networks
    /// (`/32` or `/128`), networks are returned as-is.
    pub fn as_network(&self) -> IpNet {
        match self {
            IpValue::Address(addr) => IpNet::from(*addr),
            IpValue::Network(net) => *net,
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// First and last addresses covered by a network
pub fn network_bounds(net: &IpNet) -> (IpAddr, IpAddr) {
    (net.network(), net.broadcast())
}

/// Test whether `candidate` lies entirely inside `net`
///
/// Mismatched families never contain one another. A network candidate must
/// have both its own bounds inside the container's bounds.
pub fn contains(net: &IpNet, candidate: &IpValue) -> bool {
    match candidate {
        IpValue::Address(addr) => net.contains(addr),
        IpValue::Network(inner) => net.contains(inner),
    }
}

/// Reverse DNS name for an IPv4 address, e.g. `4.3.2.1.in-addr.arpa` for
/// `1.2.3.4`
///
/// IPv6 uses a different naming scheme (nibble-reversed under `ip6.arpa`)
/// that this system does not implement, so v6 input fails with
/// [`UnsupportedFamily`] rather than producing a bogus name.
pub fn reverse_dns(addr: &IpAddr) -> Result<String, UnsupportedFamily> {
    match addr {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            Ok(format!("{}.{}.{}.{}.in-addr.arpa", d, c, b, a))
        }
        IpAddr::V6(_) => Err(UnsupportedFamily),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> IpValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_render_round_trip() {
        for text in [
            "10.0.0.5",
            "10.0.0.0/24",
            "0.0.0.0/0",
            "2001:db8::1",
            "2001:db8::/32",
            "::",
            "::ffff:192.0.2.1",
        ] {
            let value = parse(text);
            let rendered = value.to_string();
            assert_eq!(parse(&rendered), value);
            // canonical form is a fixed point
            assert_eq!(parse(&rendered).to_string(), rendered);
        }
    }

    #[test]
    fn test_render_normalizes() {
        // uncompressed IPv6 renders back compressed, lowercase
        assert_eq!(
            parse("2001:0DB8:0000:0000:0000:0000:0000:0001").to_string(),
            "2001:db8::1"
        );
        assert_eq!(parse("2001:0db8::0/32").to_string(), "2001:db8::/32");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in [
            "",
            "not-an-ip",
            "1.2.3",
            "1.2.3.4.5",
            "256.0.0.1",
            "010.0.0.1",
            "1.2.3.4/33",
            "2001:db8::/129",
            "1::2::3",
            "1.2.3.4 ",
            " 1.2.3.4",
            "1.2.3.4x",
        ] {
            assert!(text.parse::<IpValue>().is_err(), "should reject {:?}", text);
        }
    }

    #[test]
    fn test_family_inference() {
        assert!(parse("192.168.1.1").is_ipv4());
        assert!(parse("192.168.1.0/24").is_ipv4());
        assert!(!parse("2001:db8::1").is_ipv4());
        assert!(!parse("::/0").is_ipv4());
    }

    #[test]
    fn test_network_bounds() {
        let net: IpNet = "10.0.0.0/24".parse().unwrap();
        let (min, max) = network_bounds(&net);
        assert_eq!(min, "10.0.0.0".parse::<IpAddr>().unwrap());
        assert_eq!(max, "10.0.0.255".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_contains_addresses() {
        let net: IpNet = "10.0.0.0/24".parse().unwrap();
        assert!(contains(&net, &parse("10.0.0.5")));
        assert!(contains(&net, &parse("10.0.0.0")));
        assert!(contains(&net, &parse("10.0.0.255")));
        assert!(!contains(&net, &parse("10.0.1.5")));
    }

    #[test]
    fn test_contains_networks() {
        let net: IpNet = "10.0.0.0/16".parse().unwrap();
        assert!(contains(&net, &parse("10.0.0.0/16"))); // reflexive
        assert!(contains(&net, &parse("10.0.3.0/24")));
        assert!(!contains(&net, &parse("10.0.0.0/8"))); // wider than container
        assert!(!contains(&net, &parse("10.1.0.0/24")));
    }

    #[test]
    fn test_contains_family_mismatch() {
        let v4: IpNet = "10.0.0.0/8".parse().unwrap();
        let v6: IpNet = "2001:db8::/32".parse().unwrap();
        assert!(!contains(&v4, &parse("2001:db8::1")));
        assert!(!contains(&v6, &parse("10.0.0.1")));
        assert!(!contains(&v4, &parse("2001:db8::/48")));
    }

    #[test]
    fn test_reverse_dns_v4() {
        let addr: IpAddr = "1.2.3.4".parse().unwrap();
        assert_eq!(reverse_dns(&addr).unwrap(), "4.3.2.1.in-addr.arpa");
    }

    #[test]
    fn test_reverse_dns_v6_unsupported() {
        let addr: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(reverse_dns(&addr), Err(UnsupportedFamily));
    }
}

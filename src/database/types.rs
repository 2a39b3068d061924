//! Inventory record types

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::field::{DecodeError, FieldKind, FieldValue};
use crate::filters::FieldRecord;
use crate::ip;

/// A tracked machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct HostRecord {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub notes: String,
}

/// One IP address assigned to a host
///
/// The `ip` column holds the stored text form; it is decoded through the
/// address-kind field codec on every read. Legacy rows may hold text that no
/// longer parses, which the permissive codec preserves verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct IpAssignmentRecord {
    pub id: i64,
    pub host_id: i64,
    pub host: String,
    pub ip: String,
    pub fqdn: String,
    pub auto_dns: bool,
}

/// A managed CIDR block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct SubnetRecord {
    pub id: i64,
    pub owner: String,
    pub network: String,
    pub notes: String,
}

/// Display row for subnet listings, with the derived range columns
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SubnetSummary {
    pub id: i64,
    pub owner: String,
    pub network: String,
    pub min: String,
    pub max: String,
    pub num_hosts: String,
    pub notes: String,
}

impl IpAssignmentRecord {
    /// Decoded field value of the `ip` column (never fails; address kind)
    pub fn decode_ip(&self) -> FieldValue {
        FieldKind::Address
            .decode(&self.ip)
            .unwrap_or(FieldValue::Null)
    }

    /// Reverse DNS name for display: `z.y.x.w.in-addr.arpa` for IPv4,
    /// a dash for IPv6 (unsupported) and for anything that is not an address
    pub fn reverse_dns_display(&self) -> String {
        match self.decode_ip() {
            FieldValue::Address(addr) => {
                ip::reverse_dns(&addr).unwrap_or_else(|_| "-".to_string())
            }
            _ => "-".to_string(),
        }
    }
}

impl SubnetRecord {
    /// The decoded network (strict; legacy rows that fail to parse surface
    /// the error instead of a fabricated range)
    pub fn net(&self) -> Result<IpNet, DecodeError> {
        match FieldKind::Network.decode(&self.network)? {
            FieldValue::Network(net) => Ok(net),
            // Null and Raw cannot come out of a strict non-empty decode,
            // but the column is NOT NULL anyway
            _ => Err(DecodeError {
                kind: FieldKind::Network,
                input: self.network.clone(),
                reason: "empty network column".to_string(),
            }),
        }
    }

    /// Derived listing row with min/max/host-count columns
    pub fn summarize(&self) -> SubnetSummary {
        let (min, max, num_hosts) = match self.net() {
            Ok(net) => {
                let (min, max) = ip::network_bounds(&net);
                (min.to_string(), max.to_string(), host_count_display(&net))
            }
            Err(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        SubnetSummary {
            id: self.id,
            owner: self.owner.clone(),
            network: self.network.clone(),
            min,
            max,
            num_hosts,
            notes: notes_short(&self.notes),
        }
    }
}

/// Total addresses in the block, `2^(width - prefix)`
///
/// A v6 `/0` holds 2^128 addresses, one more than `u128::MAX`; that single
/// case is rendered symbolically instead of overflowing.
fn host_count_display(net: &IpNet) -> String {
    let free_bits = net.max_prefix_len() - net.prefix_len();
    if free_bits >= 128 {
        "2^128".to_string()
    } else {
        (1u128 << free_bits).to_string()
    }
}

fn notes_short(notes: &str) -> String {
    const MAX: usize = 40;
    if notes.chars().count() <= MAX {
        notes.to_string()
    } else {
        let cut: String = notes.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}

// =============================================================================
// FieldRecord implementations
// =============================================================================

impl FieldRecord for IpAssignmentRecord {
    fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "ip" => Some(self.ip.clone()),
            "fqdn" => Some(self.fqdn.clone()),
            _ => None,
        }
    }
}

impl FieldRecord for SubnetRecord {
    fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "network" => Some(self.network.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(ip: &str) -> IpAssignmentRecord {
        IpAssignmentRecord {
            id: 1,
            host_id: 1,
            host: "web01".to_string(),
            ip: ip.to_string(),
            fqdn: String::new(),
            auto_dns: true,
        }
    }

    fn subnet(network: &str) -> SubnetRecord {
        SubnetRecord {
            id: 1,
            owner: "ops".to_string(),
            network: network.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_reverse_dns_display() {
        assert_eq!(
            assignment("1.2.3.4").reverse_dns_display(),
            "4.3.2.1.in-addr.arpa"
        );
        assert_eq!(assignment("2001:db8::1").reverse_dns_display(), "-");
        assert_eq!(assignment("legacy-garbage").reverse_dns_display(), "-");
        assert_eq!(assignment("").reverse_dns_display(), "-");
    }

    #[test]
    fn test_subnet_summary() {
        let summary = subnet("10.0.0.0/24").summarize();
        assert_eq!(summary.min, "10.0.0.0");
        assert_eq!(summary.max, "10.0.0.255");
        assert_eq!(summary.num_hosts, "256");

        let summary = subnet("2001:db8::/64").summarize();
        assert_eq!(summary.num_hosts, (1u128 << 64).to_string());

        let summary = subnet("::/0").summarize();
        assert_eq!(summary.num_hosts, "2^128");
    }

    #[test]
    fn test_subnet_summary_bad_row() {
        let summary = subnet("not-a-net").summarize();
        assert_eq!(summary.min, "-");
        assert_eq!(summary.max, "-");
    }

    #[test]
    fn test_field_record_lookup() {
        let a = assignment("10.0.0.5");
        assert_eq!(a.field_text("ip"), Some("10.0.0.5".to_string()));
        assert_eq!(a.field_text("nope"), None);

        let s = subnet("10.0.0.0/24");
        assert_eq!(s.field_text("network"), Some("10.0.0.0/24".to_string()));
    }
}

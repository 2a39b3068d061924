//! Network-containment filtering over record streams
//!
//! SQLite can only answer exact and `IN` comparisons on the text columns the
//! field codec produces; it cannot express CIDR range predicates. This module
//! narrows an already-fetched record stream by network membership instead:
//! records are pulled one at a time, the named field is decoded, and the
//! record is yielded only when its value is contained in the target network.
//!
//! This is a post-fetch narrowing pass, not an indexed range query. It does
//! not reduce I/O against storage, only what is surfaced to the caller.

use ipnet::IpNet;

use crate::field::FieldKind;
use crate::ip::{self, IpParseError, IpValue};

/// Narrow read interface the filter needs from a record
///
/// Deliberately not an open-ended attribute proxy: iteration and read-field-
/// by-name are the only operations the filter performs on its input.
pub trait FieldRecord {
    /// Raw stored text of the named field, or `None` if the record has no
    /// such field
    fn field_text(&self, name: &str) -> Option<String>;
}

/// Filter configuration: which field to decode and which network to test
///
/// Read-only after construction and stateless across iterations; applying the
/// same filter to a fresh iterator re-filters from scratch.
#[derive(Debug, Clone)]
pub struct NetworkFilter {
    field: String,
    kind: FieldKind,
    target: IpNet,
}

impl NetworkFilter {
    /// Create a filter from an already-parsed target network
    pub fn new(field: impl Into<String>, kind: FieldKind, target: IpNet) -> Self {
        Self {
            field: field.into(),
            kind,
            target,
        }
    }

    /// Create a filter from a textual target
    ///
    /// The target parses eagerly so a bad literal fails here, before any
    /// record is pulled. A bare address is treated as a host network.
    pub fn parse(
        field: impl Into<String>,
        kind: FieldKind,
        target: &str,
    ) -> Result<Self, IpParseError> {
        let value: IpValue = target.parse()?;
        Ok(Self::new(field, kind, value.as_network()))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn target(&self) -> IpNet {
        self.target
    }

    /// Whether a single record's decoded field value falls inside the target
    ///
    /// Null, raw legacy text, missing fields, and decode failures are all
    /// non-matching; a broken value must never abort an otherwise-valid scan.
    pub fn matches<R: FieldRecord>(&self, record: &R) -> bool {
        let Some(raw) = record.field_text(&self.field) else {
            return false;
        };
        match self.kind.decode(&raw) {
            Ok(value) => match value.as_ip_value() {
                Some(ip_value) => ip::contains(&self.target, &ip_value),
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Lazily filter a record stream, preserving its order
    ///
    /// Stopping early is always safe; nothing is buffered or pre-pulled.
    pub fn apply<I>(&self, records: I) -> NetworkFiltered<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: FieldRecord,
    {
        NetworkFiltered {
            filter: self,
            inner: records.into_iter(),
        }
    }
}

/// Lazy iterator produced by [`NetworkFilter::apply`]
pub struct NetworkFiltered<'a, I> {
    filter: &'a NetworkFilter,
    inner: I,
}

impl<I> Iterator for NetworkFiltered<'_, I>
where
    I: Iterator,
    I::Item: FieldRecord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.by_ref().find(|record| filter.matches(record))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestRecord {
        ip: String,
    }

    impl TestRecord {
        fn new(ip: &str) -> Self {
            Self { ip: ip.to_string() }
        }
    }

    impl FieldRecord for TestRecord {
        fn field_text(&self, name: &str) -> Option<String> {
            (name == "ip").then(|| self.ip.clone())
        }
    }

    fn ips(records: &[TestRecord]) -> Vec<&str> {
        records.iter().map(|r| r.ip.as_str()).collect()
    }

    #[test]
    fn test_parse_target_eagerly() {
        assert!(NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/24").is_ok());
        assert!(NetworkFilter::parse("ip", FieldKind::Address, "not-a-net").is_err());
    }

    #[test]
    fn test_bare_address_target_is_host_network() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.5").unwrap();
        assert_eq!(filter.target(), "10.0.0.5/32".parse().unwrap());
    }

    #[test]
    fn test_filter_yields_contained_records() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/24").unwrap();
        let records = vec![
            TestRecord::new("10.0.0.5"),
            TestRecord::new("bad"),
            TestRecord::new("10.0.1.1"),
        ];
        let result: Vec<_> = filter.apply(records).collect();
        assert_eq!(ips(&result), vec!["10.0.0.5"]);
    }

    #[test]
    fn test_order_preserved() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/16").unwrap();
        let records = vec![
            TestRecord::new("10.0.2.1"),
            TestRecord::new("192.168.1.1"),
            TestRecord::new("10.0.0.1"),
            TestRecord::new("10.0.9.9"),
        ];
        let result: Vec<_> = filter.apply(records).collect();
        assert_eq!(ips(&result), vec!["10.0.2.1", "10.0.0.1", "10.0.9.9"]);
    }

    #[test]
    fn test_skip_on_decode_failure_and_null() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "0.0.0.0/0").unwrap();
        let records = vec![
            TestRecord::new(""),
            TestRecord::new("None"),
            TestRecord::new("garbage"),
            TestRecord::new("10.0.0.1"),
        ];
        let result: Vec<_> = filter.apply(records).collect();
        assert_eq!(ips(&result), vec!["10.0.0.1"]);
    }

    #[test]
    fn test_network_kind_fields() {
        let filter = NetworkFilter::parse("ip", FieldKind::Network, "10.0.0.0/16").unwrap();
        let records = vec![
            TestRecord::new("10.0.1.0/24"),
            TestRecord::new("10.0.0.0/8"), // wider than the target
            TestRecord::new("not-a-net"),  // strict decode failure, skipped
            TestRecord::new("10.0.0.7"),   // bare address inside
        ];
        let result: Vec<_> = filter.apply(records).collect();
        assert_eq!(ips(&result), vec!["10.0.1.0/24", "10.0.0.7"]);
    }

    #[test]
    fn test_family_mismatch_never_matches() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/8").unwrap();
        let records = vec![TestRecord::new("2001:db8::1")];
        assert!(filter.apply(records).next().is_none());
    }

    #[test]
    fn test_restartable() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/24").unwrap();
        let records = vec![TestRecord::new("10.0.0.1"), TestRecord::new("10.0.1.1")];
        let first: Vec<_> = filter.apply(records.clone()).collect();
        let second: Vec<_> = filter.apply(records).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let filter = NetworkFilter::parse("addr", FieldKind::Address, "0.0.0.0/0").unwrap();
        let records = vec![TestRecord::new("10.0.0.1")];
        assert!(filter.apply(records).next().is_none());
    }

    #[test]
    fn test_early_stop() {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, "10.0.0.0/8").unwrap();
        let records = vec![
            TestRecord::new("10.0.0.1"),
            TestRecord::new("10.0.0.2"),
            TestRecord::new("10.0.0.3"),
        ];
        let mut iter = filter.apply(records);
        assert_eq!(iter.next(), Some(TestRecord::new("10.0.0.1")));
        // dropping mid-iteration is fine
    }
}

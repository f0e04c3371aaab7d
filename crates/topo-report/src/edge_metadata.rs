//! Per-edge traffic metrics.

use serde::{Deserialize, Serialize};

/// Traffic metrics observed on an edge (or aggregated onto a node).
///
/// Every metric is optional: an absent metric means "not measured", which
/// is different from zero. The empty value is the identity of both
/// [`merge`](EdgeMetadata::merge) and [`flatten`](EdgeMetadata::flatten).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_bytes: Option<u64>,
    /// Peak number of concurrent TCP connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_conn_count_tcp: Option<u64>,
}

impl EdgeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, egress: u64, ingress: u64) -> Self {
        self.egress_bytes = Some(egress);
        self.ingress_bytes = Some(ingress);
        self
    }

    pub fn with_max_conn_count_tcp(mut self, count: u64) -> Self {
        self.max_conn_count_tcp = Some(count);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two observations of the same logical edge.
    ///
    /// Byte counters add up; the connection count keeps the larger peak.
    pub fn merge(self, other: EdgeMetadata) -> EdgeMetadata {
        EdgeMetadata {
            egress_bytes: combine(self.egress_bytes, other.egress_bytes, u64::saturating_add),
            ingress_bytes: combine(self.ingress_bytes, other.ingress_bytes, u64::saturating_add),
            max_conn_count_tcp: combine(self.max_conn_count_tcp, other.max_conn_count_tcp, u64::max),
        }
    }

    /// Sum metrics of distinct raw edges that collapse onto one aggregate edge.
    ///
    /// Peaks are summed too; the sum of maxima over-approximates the true
    /// concurrent peak.
    pub fn flatten(self, other: EdgeMetadata) -> EdgeMetadata {
        EdgeMetadata {
            egress_bytes: combine(self.egress_bytes, other.egress_bytes, u64::saturating_add),
            ingress_bytes: combine(self.ingress_bytes, other.ingress_bytes, u64::saturating_add),
            max_conn_count_tcp: combine(
                self.max_conn_count_tcp,
                other.max_conn_count_tcp,
                u64::saturating_add,
            ),
        }
    }
}

fn combine(left: Option<u64>, right: Option<u64>, op: fn(u64, u64) -> u64) -> Option<u64> {
    match (left, right) {
        (Some(l), Some(r)) => Some(op(l, r)),
        (l, r) => l.or(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_identity() {
        let md = EdgeMetadata::new().with_bytes(10, 20).with_max_conn_count_tcp(3);
        assert_eq!(md.merge(EdgeMetadata::new()), md);
        assert_eq!(EdgeMetadata::new().merge(md), md);
        assert_eq!(md.flatten(EdgeMetadata::new()), md);
        assert_eq!(EdgeMetadata::new().flatten(md), md);
        assert!(EdgeMetadata::new().merge(EdgeMetadata::new()).is_empty());
    }

    #[test]
    fn test_merge_keeps_peak_connections() {
        let a = EdgeMetadata::new().with_bytes(1, 2).with_max_conn_count_tcp(5);
        let b = EdgeMetadata::new().with_bytes(10, 20).with_max_conn_count_tcp(3);
        let merged = a.merge(b);
        assert_eq!(merged.egress_bytes, Some(11));
        assert_eq!(merged.ingress_bytes, Some(22));
        assert_eq!(merged.max_conn_count_tcp, Some(5));
        assert_eq!(merged, b.merge(a));
    }

    #[test]
    fn test_flatten_sums_connections() {
        let a = EdgeMetadata::new().with_max_conn_count_tcp(5);
        let b = EdgeMetadata::new().with_bytes(4, 0).with_max_conn_count_tcp(3);
        let flat = a.flatten(b);
        assert_eq!(flat.max_conn_count_tcp, Some(8));
        assert_eq!(flat.egress_bytes, Some(4));
        assert_eq!(flat.ingress_bytes, Some(0));
    }

    #[test]
    fn test_merge_is_associative() {
        let a = EdgeMetadata::new().with_bytes(1, 1);
        let b = EdgeMetadata::new().with_max_conn_count_tcp(9);
        let c = EdgeMetadata::new().with_bytes(2, 3).with_max_conn_count_tcp(4);
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        assert_eq!(a.flatten(b).flatten(c), a.flatten(b.flatten(c)));
    }

    #[test]
    fn test_absent_metrics_are_not_serialized() {
        let json = serde_json::to_string(&EdgeMetadata::new().with_max_conn_count_tcp(2)).unwrap();
        assert_eq!(json, r#"{"max_conn_count_tcp":2}"#);
    }
}

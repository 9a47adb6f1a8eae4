//! The per-index metric catalogue.
//!
//! A fixed, ordered list of definitions built once at collector
//! construction. Each definition pairs a stable descriptor with a pure
//! extraction function over one index's statistics and a label producer
//! taking the index name and the current cluster identity. Evaluation
//! order is declaration order.

use crate::types::IndexStats;
use prometheus::core::Desc;
use prometheus::proto::MetricType;
use statbridge_clusterinfo::ClusterIdentity;
use std::collections::HashMap;

/// Metric namespace of the monitored system
pub const NAMESPACE: &str = "elasticsearch";

const GIBIBYTE: f64 = 1024.0 * 1024.0 * 1024.0;

/// Static label names plus the per-index value producer
pub struct MetricLabels {
    pub names: &'static [&'static str],
    pub values: fn(&ClusterIdentity, &str) -> Vec<String>,
}

/// One catalogue entry: descriptor identity, value kind, extractor, labels
pub struct IndexMetric {
    pub kind: MetricType,
    pub desc: Desc,
    pub value: fn(&IndexStats) -> f64,
    pub labels: MetricLabels,
}

fn fq_name(subsystem: &str, name: &str) -> String {
    format!("{}_{}_{}", NAMESPACE, subsystem, name)
}

fn index_labels() -> MetricLabels {
    MetricLabels {
        names: &["index", "cluster"],
        values: |identity, index| vec![index.to_string(), identity.cluster_name.clone()],
    }
}

fn index_metric(
    name: &str,
    help: &str,
    kind: MetricType,
    value: fn(&IndexStats) -> f64,
) -> prometheus::Result<IndexMetric> {
    let labels = index_labels();
    let desc = Desc::new(
        fq_name("indices", name),
        help.to_string(),
        labels.names.iter().map(|n| n.to_string()).collect(),
        HashMap::new(),
    )?;

    Ok(IndexMetric {
        kind,
        desc,
        value,
        labels,
    })
}

/// Build the catalogue, in emission order.
///
/// The `primary_shares_size_gbytes` spelling is historical and kept so
/// existing dashboards keep working.
pub fn index_metrics() -> prometheus::Result<Vec<IndexMetric>> {
    Ok(vec![
        index_metric(
            "primary_shares_size_gbytes",
            "Current total size of stored index data in gibibytes with only primary shards on all nodes",
            MetricType::GAUGE,
            |stats| stats.primaries.store.size_in_bytes as f64 / GIBIBYTE,
        )?,
        index_metric(
            "store_size_gbytes",
            "Current total size of stored index data in gibibytes with all shards on all nodes",
            MetricType::GAUGE,
            |stats| stats.total.store.size_in_bytes as f64 / GIBIBYTE,
        )?,
        index_metric(
            "docs_primary",
            "Count of documents with only primary shards",
            MetricType::COUNTER,
            |stats| stats.primaries.docs.count as f64,
        )?,
        index_metric(
            "docs_total",
            "Total count of documents",
            MetricType::COUNTER,
            |stats| stats.total.docs.count as f64,
        )?,
        index_metric(
            "segment_count_total",
            "Current number of segments with all shards on all nodes",
            MetricType::GAUGE,
            |stats| stats.total.segments.count as f64,
        )?,
        index_metric(
            "indexing_index_total",
            "Total indexing index count",
            MetricType::COUNTER,
            |stats| stats.primaries.indexing.index_total as f64,
        )?,
        index_metric(
            "search_query_total",
            "Total search query count",
            MetricType::COUNTER,
            |stats| stats.primaries.search.query_total as f64,
        )?,
    ])
}

/// Round a value to two decimal digits the way the scrape output expects.
///
/// Display-precision policy, not a correctness requirement: the value is
/// formatted with two fractional digits and re-parsed, so `3221225472`
/// bytes emit as exactly `3.00` GiB.
pub fn round_for_display(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexStatsResponse;

    fn sample_stats() -> IndexStats {
        let doc: IndexStatsResponse = serde_json::from_str(
            r#"{
                "indices": {
                    "idx1": {
                        "primaries": {
                            "docs": {"count": 100},
                            "store": {"size_in_bytes": 3221225472},
                            "indexing": {"index_total": 5000},
                            "search": {"query_total": 250}
                        },
                        "total": {
                            "docs": {"count": 200},
                            "store": {"size_in_bytes": 6442450944},
                            "segments": {"count": 12}
                        }
                    }
                }
            }"#,
        )
        .expect("decode");
        doc.indices["idx1"].clone()
    }

    #[test]
    fn test_catalogue_is_stable() {
        let metrics = index_metrics().expect("catalogue");
        assert_eq!(metrics.len(), 7);
        assert_eq!(
            metrics[0].desc.fq_name,
            "elasticsearch_indices_primary_shares_size_gbytes"
        );

        for metric in &metrics {
            assert_eq!(metric.labels.names, &["index", "cluster"]);
            assert_eq!(metric.desc.variable_labels, vec!["index", "cluster"]);
        }
    }

    #[test]
    fn test_extractors() {
        let stats = sample_stats();
        let metrics = index_metrics().expect("catalogue");

        let by_name = |suffix: &str| {
            metrics
                .iter()
                .find(|m| m.desc.fq_name.ends_with(suffix))
                .expect("metric present")
        };

        assert_eq!((by_name("primary_shares_size_gbytes").value)(&stats), 3.0);
        assert_eq!((by_name("store_size_gbytes").value)(&stats), 6.0);
        assert_eq!((by_name("docs_primary").value)(&stats), 100.0);
        assert_eq!((by_name("docs_total").value)(&stats), 200.0);
        assert_eq!((by_name("segment_count_total").value)(&stats), 12.0);
        assert_eq!((by_name("indexing_index_total").value)(&stats), 5000.0);
        assert_eq!((by_name("search_query_total").value)(&stats), 250.0);
    }

    #[test]
    fn test_extractors_total_over_defaults() {
        // A well-formed but empty index record extracts zeros, never errors
        let stats = IndexStats::default();
        for metric in index_metrics().expect("catalogue") {
            assert_eq!((metric.value)(&stats), 0.0);
        }
    }

    #[test]
    fn test_label_values_order() {
        let labels = index_labels();
        let identity = ClusterIdentity::new("prod-cluster");
        assert_eq!(
            (labels.values)(&identity, "idx1"),
            vec!["idx1".to_string(), "prod-cluster".to_string()]
        );
    }

    #[test]
    fn test_round_for_display() {
        assert_eq!(round_for_display(3.0), 3.0);
        assert_eq!(round_for_display(2.999999), 3.0);
        assert_eq!(round_for_display(1.005), 1.0); // 1.005 is 1.00499… in binary
        assert_eq!(round_for_display(0.125), 0.12); // round half to even
        assert_eq!(round_for_display(1234567.0), 1234567.0);
    }
}

//! The index-statistics collector.
//!
//! Implements the Prometheus `Collector` trait. Every `collect()` call is
//! one collection cycle: fetch, decode, evaluate the catalogue per index,
//! then append the health families. Failures degrade the cycle to
//! health-only output; nothing propagates to the caller.
//!
//! Concurrent `collect()` invocations are not defended against here: the
//! hosting scrape runtime is expected to serialize them.

use crate::catalogue::{index_metrics, round_for_display, IndexMetric, NAMESPACE};
use crate::error::{CollectError, CollectResult};
use crate::fetcher::StatsClient;
use crate::types::IndexStatsResponse;
use prometheus::core::{Collector, Desc};
use prometheus::proto::{self, MetricFamily, MetricType};
use prometheus::{Gauge, IntCounter, Opts};
use reqwest::Url;
use statbridge_clusterinfo::{ClusterIdentity, IdentityCache};
use tracing::{debug, warn};

const SUBSYSTEM: &str = "index_stats";

/// Collects per-index statistics and the collector's own health series.
pub struct IndicesCollector {
    client: StatsClient,
    identity: IdentityCache,
    metrics: Vec<IndexMetric>,
    up: Gauge,
    total_scrapes: IntCounter,
    json_parse_failures: IntCounter,
}

impl IndicesCollector {
    /// Create a collector scraping the given cluster base URL.
    ///
    /// The identity cache supplies the cluster label value; until its
    /// first update, samples carry the sentinel cluster name.
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: Url,
        identity: IdentityCache,
    ) -> prometheus::Result<Self> {
        let up = Gauge::with_opts(
            Opts::new(
                "up",
                "Was the last scrape of the index stats endpoint successful.",
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        )?;
        let total_scrapes = IntCounter::with_opts(
            Opts::new("total_scrapes", "Current total index stats scrapes.")
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
        )?;
        let json_parse_failures = IntCounter::with_opts(
            Opts::new(
                "json_parse_failures",
                "Number of errors while decoding the index stats response.",
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        )?;

        Ok(Self {
            client: StatsClient::new(client, base_url),
            identity,
            metrics: index_metrics()?,
            up,
            total_scrapes,
            json_parse_failures,
        })
    }

    /// Fetch and decode one statistics document.
    ///
    /// Decode failures increment the parse-failure counter exactly once;
    /// the document is all-or-nothing.
    fn fetch_and_decode(&self) -> CollectResult<IndexStatsResponse> {
        let body = self.client.fetch_index_stats()?;

        match serde_json::from_slice(&body) {
            Ok(document) => Ok(document),
            Err(err) => {
                self.json_parse_failures.inc();
                Err(CollectError::Decode(err))
            }
        }
    }

    /// Evaluate the catalogue over the document: one family per
    /// definition, one child sample per index.
    fn index_families(&self, document: &IndexStatsResponse) -> Vec<MetricFamily> {
        let identity = self.identity.current();

        self.metrics
            .iter()
            .filter_map(|metric| {
                let family = index_family(metric, document, &identity);
                (!family.get_metric().is_empty()).then_some(family)
            })
            .collect()
    }
}

impl Collector for IndicesCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs: Vec<&Desc> = self.metrics.iter().map(|m| &m.desc).collect();
        descs.extend(self.up.desc());
        descs.extend(self.total_scrapes.desc());
        descs.extend(self.json_parse_failures.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.total_scrapes.inc();

        let mut families = match self.fetch_and_decode() {
            Ok(document) => {
                self.up.set(1.0);
                debug!(indices = document.indices.len(), "collected index stats");
                self.index_families(&document)
            }
            Err(err) => {
                self.up.set(0.0);
                warn!(error = %err, "failed to fetch and decode index stats");
                Vec::new()
            }
        };

        // Health families close out the cycle on every path.
        families.extend(self.up.collect());
        families.extend(self.total_scrapes.collect());
        families.extend(self.json_parse_failures.collect());
        families
    }
}

/// Build the const family for one definition over every index.
fn index_family(
    metric: &IndexMetric,
    document: &IndexStatsResponse,
    identity: &ClusterIdentity,
) -> MetricFamily {
    let mut family = MetricFamily::default();
    family.set_name(metric.desc.fq_name.clone());
    family.set_help(metric.desc.help.clone());
    family.set_field_type(metric.kind);

    let mut samples = Vec::with_capacity(document.indices.len());
    for (index_name, stats) in &document.indices {
        let mut sample = proto::Metric::default();

        let pairs: Vec<proto::LabelPair> = metric
            .labels
            .names
            .iter()
            .zip((metric.labels.values)(identity, index_name))
            .map(|(name, value)| {
                let mut pair = proto::LabelPair::default();
                pair.set_name(name.to_string());
                pair.set_value(value);
                pair
            })
            .collect();
        sample.set_label(pairs.into());

        let value = round_for_display((metric.value)(stats));
        match metric.kind {
            MetricType::COUNTER => {
                let mut counter = proto::Counter::default();
                counter.set_value(value);
                sample.set_counter(counter);
            }
            _ => {
                let mut gauge = proto::Gauge::default();
                gauge.set_value(value);
                sample.set_gauge(gauge);
            }
        }

        samples.push(sample);
    }
    family.set_metric(samples.into());

    family
}

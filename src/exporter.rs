//! Prometheus exposition of the latest reports.
use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use prometheus::{Encoder, Gauge, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{
    cache::Cache,
    error::Result,
    projection::{Metric, MetricSample, project},
    report::Class,
    runtime::Runtime,
};

/// Content type of [Exporter::render]
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Renders the [Cache] content and session counters, on demand.
#[derive(Debug, Clone)]
pub struct Exporter {
    cache: Arc<Cache>,
    runtime: Arc<Runtime>,
    fallback_device: String,
}

impl Exporter {
    pub fn new(cache: Arc<Cache>, runtime: Arc<Runtime>, fallback_device: &str) -> Self {
        Self {
            cache,
            runtime,
            fallback_device: fallback_device.to_string(),
        }
    }

    /// Metric families this exporter may emit from reports
    pub fn describe() -> &'static [Metric] {
        &Metric::ALL
    }

    /// Current samples, projected from a single cache snapshot
    pub fn samples(&self) -> Vec<MetricSample> {
        let (sky, tpv) = self.cache.snapshot();
        project(&sky, tpv.as_ref(), &self.fallback_device)
    }

    /// Text exposition of the current readings.
    ///
    /// Samples sharing a family and label set (duplicated PRNs) collapse
    /// onto the last one, series must be unique in an exposition.
    pub fn render(&self) -> Result<Vec<u8>> {
        let registry = Registry::new();

        let mut families = BTreeMap::<Metric, GaugeVec>::new();

        for sample in self.samples() {
            let gauges = match families.entry(sample.metric) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let gauges = GaugeVec::new(
                        Opts::new(sample.name(), sample.help()),
                        sample.label_names(),
                    )?;
                    registry.register(Box::new(gauges.clone()))?;
                    entry.insert(gauges)
                },
            };

            let labels = sample
                .label_values
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>();

            gauges.with_label_values(&labels).set(sample.value);
        }

        self.register_session(&registry)?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let mut buffer = Vec::with_capacity(4096);
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    fn register_session(&self, registry: &Registry) -> Result<()> {
        let reports = IntCounterVec::new(
            Opts::new(
                "gpsd_exporter_reports_total",
                "Reports decoded since the session started",
            ),
            &["class"],
        )?;

        let failures = IntCounterVec::new(
            Opts::new(
                "gpsd_exporter_decode_failures_total",
                "Reports dropped because their content could not be decoded",
            ),
            &["class"],
        )?;

        for class in Class::ALL {
            reports
                .with_label_values(&[class.tag()])
                .inc_by(self.runtime.reports(class));
            failures
                .with_label_values(&[class.tag()])
                .inc_by(self.runtime.decode_failures(class));
        }

        let unknown = IntCounter::new(
            "gpsd_exporter_unknown_reports_total",
            "Reports of a class this exporter does not implement",
        )?;
        unknown.inc_by(self.runtime.unknown_reports());

        let uptime = Gauge::new(
            "gpsd_exporter_uptime_seconds",
            "Time elapsed since the exporter started",
        )?;
        uptime.set(self.runtime.uptime().to_seconds());

        registry.register(Box::new(reports))?;
        registry.register(Box::new(failures))?;
        registry.register(Box::new(unknown))?;
        registry.register(Box::new(uptime))?;
        Ok(())
    }
}

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * GPSD-EXPORTER exposes GPSD reports as Prometheus metrics.
 * This crate is shipped under Mozilla Public V2 license.
 */

pub mod cache;
pub mod client;
pub mod error;
pub mod exporter;
pub mod projection;
pub mod report;
pub mod runtime;
pub mod settings;

pub mod prelude {
    pub use crate::cache::Cache;
    pub use crate::client::{Client, Closer, Dispatch};
    pub use crate::error::{Error, Result};
    pub use crate::exporter::Exporter;
    pub use crate::projection::{DEFAULT_DEVICE, Metric, MetricSample, project};
    pub use crate::report::{Class, Satellite, Sky, Tpv, Version};
    pub use crate::runtime::Runtime;
    pub use crate::settings::Settings;
}

use crate::projection::DEFAULT_DEVICE;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// HTTP listening address for scrapes
    pub listen_address: String,

    /// HTTP path serving the metrics
    pub metrics_path: String,

    /// GPSD daemon address (`host:port`)
    pub gpsd_address: String,

    /// `device` label for reports that do not name their device
    pub default_device: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9477".to_string(),
            metrics_path: "/metrics".to_string(),
            gpsd_address: "127.0.0.1:2947".to_string(),
            default_device: DEFAULT_DEVICE.to_string(),
        }
    }
}

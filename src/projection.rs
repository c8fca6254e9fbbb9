//! Projection of the latest reports onto labeled gauge samples.
//!
//! Every metric family is a gauge. Satellite families are labeled by
//! `device` and `prn`, fix families by `device` only. Optional report
//! fields that were not transmitted produce no sample at all.
use crate::report::{Satellite, Sky, Tpv};

/// Device label used when a report does not name its device
pub const DEFAULT_DEVICE: &str = "/dev/ttyS0";

const SATELLITE_LABELS: &[&str] = &["device", "prn"];
const FIX_LABELS: &[&str] = &["device"];

/// Metric families exported from the latest reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    SatelliteAzimuth,
    SatelliteElevation,
    SatelliteSignalToNoise,
    SatelliteUsed,
    SatelliteGnssId,
    SatelliteSvId,
    SatelliteSigId,
    SatelliteFreqId,
    SatelliteHealth,
    FixLatitude,
    FixLongitude,
    FixAltitude,
    FixMode,
    FixStatus,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::SatelliteAzimuth,
        Metric::SatelliteElevation,
        Metric::SatelliteSignalToNoise,
        Metric::SatelliteUsed,
        Metric::SatelliteGnssId,
        Metric::SatelliteSvId,
        Metric::SatelliteSigId,
        Metric::SatelliteFreqId,
        Metric::SatelliteHealth,
        Metric::FixLatitude,
        Metric::FixLongitude,
        Metric::FixAltitude,
        Metric::FixMode,
        Metric::FixStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SatelliteAzimuth => "gpsd_satellite_azimuth_degrees",
            Self::SatelliteElevation => "gpsd_satellite_elevation_degrees",
            Self::SatelliteSignalToNoise => "gpsd_satellite_snr_dbhz",
            Self::SatelliteUsed => "gpsd_satellite_used",
            Self::SatelliteGnssId => "gpsd_satellite_gnssid",
            Self::SatelliteSvId => "gpsd_satellite_svid",
            Self::SatelliteSigId => "gpsd_satellite_sigid",
            Self::SatelliteFreqId => "gpsd_satellite_freqid",
            Self::SatelliteHealth => "gpsd_satellite_health",
            Self::FixLatitude => "gpsd_gps_fix_latitude_degrees",
            Self::FixLongitude => "gpsd_gps_fix_longitude_degrees",
            Self::FixAltitude => "gpsd_gps_fix_altitude_meters",
            Self::FixMode => "gpsd_gps_fix_mode",
            Self::FixStatus => "gpsd_gps_fix_status",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::SatelliteAzimuth => "Satellite azimuth in degrees from true north",
            Self::SatelliteElevation => "Satellite elevation in degrees above the horizon",
            Self::SatelliteSignalToNoise => "Satellite signal-to-noise ratio in decibel-hertz",
            Self::SatelliteUsed => "Whether the satellite is used to determine fix",
            Self::SatelliteGnssId => "Satellite GNSS ID",
            Self::SatelliteSvId => "Satellite ID within its constellation",
            Self::SatelliteSigId => "Signal ID",
            Self::SatelliteFreqId => "Frequency ID (GLONASS only)",
            Self::SatelliteHealth => "Satellite health",
            Self::FixLatitude => "GPS fix latitude in degrees north of the equator",
            Self::FixLongitude => "GPS fix longitude in degrees east of the prime meridian",
            Self::FixAltitude => "GPS fix altitude in meters above mean sea level (MSL)",
            Self::FixMode => "NMEA fix mode",
            Self::FixStatus => "GPS fix status",
        }
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        if self.is_satellite() {
            SATELLITE_LABELS
        } else {
            FIX_LABELS
        }
    }

    pub fn is_satellite(&self) -> bool {
        matches!(
            self,
            Self::SatelliteAzimuth
                | Self::SatelliteElevation
                | Self::SatelliteSignalToNoise
                | Self::SatelliteUsed
                | Self::SatelliteGnssId
                | Self::SatelliteSvId
                | Self::SatelliteSigId
                | Self::SatelliteFreqId
                | Self::SatelliteHealth
        )
    }
}

/// One gauge reading: family, label values (ordered like
/// [Metric::label_names]) and value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub metric: Metric,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl MetricSample {
    pub fn name(&self) -> &'static str {
        self.metric.name()
    }

    pub fn help(&self) -> &'static str {
        self.metric.help()
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.metric.label_names()
    }
}

/// Projects the latest [Sky] and [Tpv] onto gauge samples.
///
/// The `device` label comes from each report, `fallback_device` is used
/// when the report does not carry one. Satellites are visited in report
/// order and duplicated PRNs each produce their own samples.
pub fn project(sky: &Sky, tpv: Option<&Tpv>, fallback_device: &str) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(5 + 9 * sky.satellites.len());

    if let Some(tpv) = tpv {
        project_fix(&mut samples, tpv, fallback_device);
    }

    let device = sky.device.as_deref().unwrap_or(fallback_device);

    for sat in sky.satellites.iter() {
        project_satellite(&mut samples, device, sat);
    }

    samples
}

fn project_fix(samples: &mut Vec<MetricSample>, tpv: &Tpv, fallback_device: &str) {
    let device = tpv.device.as_deref().unwrap_or(fallback_device);

    let gauges = [
        (Metric::FixLatitude, tpv.latitude),
        (Metric::FixLongitude, tpv.longitude),
        (Metric::FixAltitude, tpv.altitude),
        (Metric::FixMode, Some(f64::from(tpv.mode))),
        (Metric::FixStatus, tpv.status.map(f64::from)),
    ];

    for (metric, value) in gauges {
        if let Some(value) = value {
            samples.push(MetricSample {
                metric,
                label_values: vec![device.to_string()],
                value,
            });
        }
    }
}

fn project_satellite(samples: &mut Vec<MetricSample>, device: &str, sat: &Satellite) {
    let labels = vec![device.to_string(), sat.prn.to_string()];

    samples.push(MetricSample {
        metric: Metric::SatelliteUsed,
        label_values: labels.clone(),
        value: if sat.used { 1.0 } else { 0.0 },
    });

    let gauges = [
        (Metric::SatelliteAzimuth, sat.azimuth),
        (Metric::SatelliteElevation, sat.elevation),
        (Metric::SatelliteSignalToNoise, sat.signal_to_noise),
        (Metric::SatelliteGnssId, sat.gnss_id.map(f64::from)),
        (Metric::SatelliteSvId, sat.sv_id.map(f64::from)),
        (Metric::SatelliteSigId, sat.sig_id.map(f64::from)),
        (Metric::SatelliteFreqId, sat.freq_id.map(f64::from)),
        (Metric::SatelliteHealth, sat.health.map(f64::from)),
    ];

    for (metric, value) in gauges {
        if let Some(value) = value {
            samples.push(MetricSample {
                metric,
                label_values: labels.clone(),
                value,
            });
        }
    }
}

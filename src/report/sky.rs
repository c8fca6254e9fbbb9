use serde::Deserialize;

/// SKY report: sky view of the satellite positions.
///
/// Only the fields we export are decoded, everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sky {
    /// Name of the originating device
    pub device: Option<String>,

    /// Satellites in view, in the order the daemon listed them.
    /// PRNs are not guaranteed to be unique.
    #[serde(default)]
    pub satellites: Vec<Satellite>,
}

/// One satellite entry of a [Sky] report.
///
/// Apart from `PRN` and `used`, every field may be omitted by the daemon.
/// Omitted fields stay [None], they never default to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Satellite {
    /// Pseudo-random noise identifier
    #[serde(rename = "PRN")]
    pub prn: u16,

    /// Azimuth, degrees from true north
    #[serde(rename = "az")]
    pub azimuth: Option<f64>,

    /// Elevation, degrees above the horizon
    #[serde(rename = "el")]
    pub elevation: Option<f64>,

    /// Signal to noise ratio in dB-Hz
    #[serde(rename = "ss")]
    pub signal_to_noise: Option<f64>,

    #[serde(rename = "gnssid")]
    pub gnss_id: Option<u8>,

    /// Satellite ID within its constellation
    #[serde(rename = "svid")]
    pub sv_id: Option<u16>,

    #[serde(rename = "sigid")]
    pub sig_id: Option<u8>,

    /// Frequency ID (GLONASS only)
    #[serde(rename = "freqid")]
    pub freq_id: Option<u8>,

    pub health: Option<u8>,

    /// Whether this satellite contributes to the current fix
    pub used: bool,
}

impl Sky {
    /// Number of satellites contributing to the fix
    pub fn used(&self) -> usize {
        self.satellites.iter().filter(|sat| sat.used).count()
    }
}

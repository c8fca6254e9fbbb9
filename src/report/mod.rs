//! GPSD reports.
//!
//! Each line emitted by the daemon is a JSON object tagged with a `class`.
//! A line is first decoded as a [GenericReport] to sniff that tag, then
//! decoded a second time into the matching typed report.
use serde::{Deserialize, Deserializer};

pub mod sky;
pub mod tpv;
pub mod version;

pub use sky::{Satellite, Sky};
pub use tpv::Tpv;
pub use version::Version;

/// Envelope shared by all reports, only used to classify a line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenericReport {
    /// Class tag, empty when absent or `null`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub class: String,
}

impl GenericReport {
    /// Decodes the envelope of a line. Any JSON object (or `null`) is an
    /// envelope, possibly with an empty tag. Invalid JSON, other JSON values
    /// and a non-string tag are errors.
    pub fn decode(line: &[u8]) -> serde_json::Result<Self> {
        let report = serde_json::from_slice::<Option<Self>>(line)?;
        Ok(report.unwrap_or_default())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Report classes this crate knows how to decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Class {
    /// VERSION, shipped once to each client on connection
    Version,
    /// SKY view of the satellite positions
    Sky,
    /// TPV (time-position-velocity) fix report
    Tpv,
}

impl Class {
    /// All known classes, in counter order
    pub const ALL: [Class; 3] = [Class::Version, Class::Sky, Class::Tpv];

    /// Classifies a `class` tag, [None] for classes we do not implement
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "VERSION" => Some(Self::Version),
            "SKY" => Some(Self::Sky),
            "TPV" => Some(Self::Tpv),
            _ => None,
        }
    }

    /// Tag as it appears on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Version => "VERSION",
            Self::Sky => "SKY",
            Self::Tpv => "TPV",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Version => 0,
            Self::Sky => 1,
            Self::Tpv => 2,
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

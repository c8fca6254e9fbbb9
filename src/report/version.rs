use serde::Deserialize;

/// VERSION report: the daemon ships one to each client when it connects.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Version {
    /// Public release level
    pub release: String,

    /// Internal revision-control level
    pub rev: String,

    /// API major revision level
    pub proto_major: u32,

    /// API minor revision level
    pub proto_minor: u32,

    /// URL of the remote daemon, when this one is a relay
    pub remote: Option<String>,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gpsd {} (rev {}) protocol v{}.{}",
            self.release, self.rev, self.proto_major, self.proto_minor,
        )?;
        if let Some(remote) = &self.remote {
            write!(f, " via {}", remote)?;
        }
        Ok(())
    }
}

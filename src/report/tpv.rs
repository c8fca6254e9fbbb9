use serde::Deserialize;

/// TPV report: time-position-velocity fix.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tpv {
    /// Name of the originating device
    pub device: Option<String>,

    /// NMEA mode: 0=unknown, 1=no fix, 2=2D, 3=3D. Always transmitted.
    pub mode: u8,

    /// Fix status (DGPS, RTK, dead reckoning...)
    pub status: Option<u8>,

    /// Latitude in degrees, +/- signifies North/South
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,

    /// Longitude in degrees, +/- signifies East/West
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,

    /// Altitude in meters (MSL)
    #[serde(rename = "alt")]
    pub altitude: Option<f64>,
}

impl Tpv {
    /// True when the receiver reports a 2D or 3D fix
    pub fn has_fix(&self) -> bool {
        self.mode >= 2
    }
}

impl std::fmt::Display for Tpv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mode={}", self.mode)?;
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            write!(f, " lat={:.7} lon={:.7}", lat, lon)?;
        }
        if let Some(alt) = self.altitude {
            write!(f, " alt={:.3}m", alt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_mode_only() {
        let tpv: Tpv = serde_json::from_str(r#"{"class":"TPV","mode":3}"#).unwrap();
        assert_eq!(
            tpv,
            Tpv {
                mode: 3,
                ..Default::default()
            }
        );
        assert!(tpv.has_fix());
    }

    #[test]
    fn decode_full_fix() {
        let line = r#"{"class":"TPV","device":"/dev/pts/1","mode":3,"status":2,"time":"2005-06-08T10:34:48.283Z","ept":0.005,"lat":46.498293369,"lon":7.567411672,"alt":1343.127,"eph":36.000,"speed":0.091}"#;
        let tpv: Tpv = serde_json::from_str(line).unwrap();

        assert_eq!(tpv.device.as_deref(), Some("/dev/pts/1"));
        assert_eq!(tpv.status, Some(2));
        assert_eq!(tpv.latitude, Some(46.498293369));
        assert_eq!(tpv.longitude, Some(7.567411672));
        assert_eq!(tpv.altitude, Some(1343.127));
        assert_eq!(
            tpv.to_string(),
            "mode=3 lat=46.4982934 lon=7.5674117 alt=1343.127m"
        );
    }

    #[test]
    fn zero_is_not_absent() {
        let tpv: Tpv =
            serde_json::from_str(r#"{"class":"TPV","mode":1,"lat":0.0,"alt":0}"#).unwrap();
        assert_eq!(tpv.latitude, Some(0.0));
        assert_eq!(tpv.altitude, Some(0.0));
        assert!(tpv.longitude.is_none());
        assert!(!tpv.has_fix());
    }

    #[test]
    fn mode_is_required() {
        assert!(serde_json::from_str::<Tpv>(r#"{"class":"TPV","lat":1.0}"#).is_err());
    }
}

//! Human-readable link speed and connection labels.
//!
//! Rates in the payload are kbit/s. Band detection is a substring heuristic
//! on the router's interface names (`AP:5G:0`, `AP:2G:0`, `LAN:1`, ...); the
//! naming is vendor-specific and unknown formats fall back to a generic
//! label.

pub const BAND_5GHZ: &str = "5 GHz";
pub const BAND_24GHZ: &str = "2,4 GHz";
pub const BAND_WIFI: &str = "WiFi";
pub const BAND_LAN: &str = "LAN";
pub const BAND_UNKNOWN: &str = "Unknown";

/// Interface prefixes of 2.4 GHz access points that don't spell out "2G".
const AP_24GHZ_PREFIXES: &[&str] = &["AP:2.4", "AP2.4", "AP24"];
const WIRED_PREFIXES: &[&str] = &["LAN", "ETH"];
const WIRELESS_PREFIXES: &[&str] = &["AP", "WLAN", "WIFI"];

/// Physical medium of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Wireless,
    Wired,
    Unknown,
}

impl Medium {
    /// Classify from the reported connection type, falling back to the
    /// interface name when the type is missing or unfamiliar.
    pub fn classify(connection_type: Option<&str>, interface: Option<&str>) -> Self {
        let kind = connection_type.map(|t| t.trim().to_ascii_uppercase());
        match kind.as_deref() {
            Some("WLAN" | "WIFI" | "WIRELESS") => return Self::Wireless,
            Some("LAN" | "ETHERNET") => return Self::Wired,
            _ => {}
        }

        let iface = interface.map(|i| i.trim().to_ascii_uppercase()).unwrap_or_default();
        if WIRED_PREFIXES.iter().any(|p| iface.starts_with(p)) {
            Self::Wired
        } else if WIRELESS_PREFIXES.iter().any(|p| iface.starts_with(p)) {
            Self::Wireless
        } else {
            Self::Unknown
        }
    }
}

/// Frequency band of a wireless interface.
pub fn wifi_band(interface: Option<&str>) -> &'static str {
    let iface = interface.map(str::to_ascii_uppercase).unwrap_or_default();
    if iface.contains("5G") {
        BAND_5GHZ
    } else if iface.contains("2G") || AP_24GHZ_PREFIXES.iter().any(|p| iface.starts_with(p)) {
        BAND_24GHZ
    } else {
        BAND_WIFI
    }
}

/// Format a rate in kbit/s as "999 kbit/s", "867 Mbit/s" or "1.2 Gbit/s".
///
/// Zero and absent rates have no label.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_speed(kbps: Option<u64>) -> Option<String> {
    match kbps? {
        0 => None,
        v if v >= 1_000_000 => Some(format!("{:.1} Gbit/s", v as f64 / 1_000_000.0)),
        v if v >= 1_000 => Some(format!("{} Mbit/s", (v + 500) / 1_000)),
        v => Some(format!("{v} kbit/s")),
    }
}

/// Label a link as `<band> → <speed>`, or just the band without a rate.
///
/// Wireless links prefer the current rate (live status); wired links prefer
/// the negotiated maximum (stable).
pub fn link_label(
    medium: Medium,
    interface: Option<&str>,
    current_kbps: Option<u64>,
    max_kbps: Option<u64>,
) -> String {
    let nonzero = |v: Option<u64>| v.filter(|&v| v > 0);
    let (band, speed) = match medium {
        Medium::Wireless => (
            wifi_band(interface),
            nonzero(current_kbps).or(nonzero(max_kbps)),
        ),
        Medium::Wired => (BAND_LAN, nonzero(max_kbps).or(nonzero(current_kbps))),
        Medium::Unknown => (BAND_UNKNOWN, None),
    };

    match fmt_speed(speed) {
        Some(speed) => format!("{band} → {speed}"),
        None => band.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn speed_thresholds() {
        assert_eq!(fmt_speed(Some(999)).as_deref(), Some("999 kbit/s"));
        assert_eq!(fmt_speed(Some(1_000)).as_deref(), Some("1 Mbit/s"));
        assert_eq!(fmt_speed(Some(866_700)).as_deref(), Some("867 Mbit/s"));
        assert_eq!(fmt_speed(Some(1_000_000)).as_deref(), Some("1.0 Gbit/s"));
        assert_eq!(fmt_speed(Some(2_402_000)).as_deref(), Some("2.4 Gbit/s"));
        assert_eq!(fmt_speed(Some(0)), None);
        assert_eq!(fmt_speed(None), None);
    }

    #[test]
    fn band_detection() {
        assert_eq!(wifi_band(Some("AP:5G:0")), BAND_5GHZ);
        assert_eq!(wifi_band(Some("ap:2g:1")), BAND_24GHZ);
        assert_eq!(wifi_band(Some("AP2.4:0")), BAND_24GHZ);
        assert_eq!(wifi_band(Some("AP:6G:0")), BAND_WIFI);
        assert_eq!(wifi_band(None), BAND_WIFI);
    }

    #[test]
    fn medium_classification() {
        assert_eq!(Medium::classify(Some("WLAN"), None), Medium::Wireless);
        assert_eq!(Medium::classify(Some("lan"), Some("AP:5G:0")), Medium::Wired);
        assert_eq!(Medium::classify(None, Some("LAN:2")), Medium::Wired);
        assert_eq!(Medium::classify(Some(""), Some("eth0")), Medium::Wired);
        assert_eq!(Medium::classify(None, Some("AP:2G:0")), Medium::Wireless);
        assert_eq!(Medium::classify(None, None), Medium::Unknown);
    }

    #[test]
    fn wireless_prefers_current_rate() {
        assert_snapshot!(
            link_label(Medium::Wireless, Some("AP:5G:0"), Some(866_700), Some(1_200_000)),
            @"5 GHz → 867 Mbit/s"
        );
        assert_snapshot!(
            link_label(Medium::Wireless, Some("AP:2G:0"), Some(0), Some(144_000)),
            @"2,4 GHz → 144 Mbit/s"
        );
        assert_snapshot!(
            link_label(Medium::Wireless, None, Some(1_000_000), None),
            @"WiFi → 1.0 Gbit/s"
        );
    }

    #[test]
    fn wired_prefers_negotiated_maximum() {
        assert_snapshot!(
            link_label(Medium::Wired, Some("LAN:1"), Some(12_000), Some(1_000_000)),
            @"LAN → 1.0 Gbit/s"
        );
        assert_snapshot!(
            link_label(Medium::Wired, Some("LAN:1"), Some(95_000), None),
            @"LAN → 95 Mbit/s"
        );
    }

    #[test]
    fn missing_rates_leave_only_the_band() {
        assert_eq!(link_label(Medium::Wired, None, None, Some(0)), "LAN");
        assert_eq!(link_label(Medium::Wireless, Some("AP:5G:0"), None, None), "5 GHz");
        assert_eq!(link_label(Medium::Unknown, None, Some(100), None), "Unknown");
    }
}

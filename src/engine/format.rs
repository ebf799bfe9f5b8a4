//! Human-readable magnitudes for dashboard metrics.

/// Unit labels for each power of one thousand, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnitudeUnits {
    pub units: &'static str,
    pub thousands: &'static str,
    pub millions: &'static str,
}

impl MagnitudeUnits {
    pub const ENGLISH: MagnitudeUnits = MagnitudeUnits {
        units: "",
        thousands: "thousand",
        millions: "million",
    };

    pub const PORTUGUESE: MagnitudeUnits = MagnitudeUnits {
        units: "",
        thousands: "mil",
        millions: "milhões",
    };
}

impl Default for MagnitudeUnits {
    fn default() -> Self {
        Self::ENGLISH
    }
}

/// Format `value` as `"{prefix} {scaled:.2} {unit}"` with English units.
///
/// ```
/// use sales_dashboard::engine::format_magnitude;
///
/// assert_eq!(format_magnitude(1_234_567.0, "R$"), "R$ 1.23 million");
/// assert_eq!(format_magnitude(0.0, "R$"), "R$ 0.00 ");
/// ```
pub fn format_magnitude(value: f64, prefix: &str) -> String {
    format_magnitude_with(value, prefix, &MagnitudeUnits::ENGLISH)
}

/// Like [`format_magnitude`] with custom unit labels.
///
/// Scaling stops at millions: a billion prints as `1000.00` millions.
/// Negative values are below the first threshold and are never scaled.
pub fn format_magnitude_with(value: f64, prefix: &str, units: &MagnitudeUnits) -> String {
    let mut scaled = value;
    for unit in [units.units, units.thousands] {
        if scaled < 1000.0 {
            return format!("{} {:.2} {}", prefix, scaled, unit);
        }
        scaled /= 1000.0;
    }
    format!("{} {:.2} {}", prefix, scaled, units.millions)
}

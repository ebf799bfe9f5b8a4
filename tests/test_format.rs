//! Magnitude formatting of dashboard metrics.

use sales_dashboard::{format_magnitude, format_magnitude_with, MagnitudeUnits};

#[test]
fn zero_is_unscaled_with_trailing_space() {
    assert_eq!(format_magnitude(0.0, "R$"), "R$ 0.00 ");
}

#[test]
fn below_one_thousand_is_unscaled() {
    assert_eq!(format_magnitude(999.0, "R$"), "R$ 999.00 ");
    assert_eq!(format_magnitude(12.345, "R$"), "R$ 12.35 ");
}

#[test]
fn thousands() {
    assert_eq!(format_magnitude(1500.0, "R$"), "R$ 1.50 thousand");
    assert_eq!(format_magnitude(1000.0, "R$"), "R$ 1.00 thousand");
    assert_eq!(format_magnitude(999_999.0, "R$"), "R$ 1000.00 thousand");
}

#[test]
fn millions() {
    assert_eq!(format_magnitude(2_500_000.0, "R$"), "R$ 2.50 million");
    assert_eq!(format_magnitude(1_234_567.0, "R$"), "R$ 1.23 million");
}

#[test]
fn billions_stay_labeled_as_millions() {
    assert_eq!(format_magnitude(1_000_000_000.0, "R$"), "R$ 1000.00 million");
    assert_eq!(format_magnitude(7_250_000_000.0, "R$"), "R$ 7250.00 million");
}

#[test]
fn empty_prefix_keeps_leading_space() {
    assert_eq!(format_magnitude(8.0, ""), " 8.00 ");
    assert_eq!(format_magnitude(4500.0, ""), " 4.50 thousand");
}

#[test]
fn negative_values_are_never_scaled() {
    assert_eq!(format_magnitude(-2500.0, "R$"), "R$ -2500.00 ");
}

#[test]
fn portuguese_units() {
    let pt = MagnitudeUnits::PORTUGUESE;
    assert_eq!(format_magnitude_with(0.0, "R$", &pt), "R$ 0.00 ");
    assert_eq!(format_magnitude_with(1500.0, "R$", &pt), "R$ 1.50 mil");
    assert_eq!(format_magnitude_with(2_500_000.0, "R$", &pt), "R$ 2.50 milhões");
}

#[test]
fn default_units_are_english() {
    assert_eq!(MagnitudeUnits::default(), MagnitudeUnits::ENGLISH);
}

//! Histogram bucket labels.

use crate::model::clamp_confidence;

/// Decile label such as `"0.5-0.6"`. The top bin is closed, so `1.0` lands
/// in `"0.9-1.0"`.
pub fn confidence_bin(confidence: f64) -> String {
    let decile = ((clamp_confidence(confidence) * 10.0).floor() as usize).min(9);
    format!(
        "{:.1}-{:.1}",
        decile as f64 / 10.0,
        (decile + 1) as f64 / 10.0
    )
}

/// Coarse bucket for small counts: exact up to 4, then ranges.
pub fn count_bucket(count: usize) -> &'static str {
    match count {
        0 => "0",
        1 => "1",
        2 => "2",
        3 => "3",
        4 => "4",
        5..=9 => "5-9",
        10..=19 => "10-19",
        _ => "20+",
    }
}

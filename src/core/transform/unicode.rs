//! Rare ideograph detection
//!
//! Buyer names containing code points from the supplementary ideographic
//! planes (U+20000 to U+2FFFF) often fail to render in the billing system's
//! font set. They are flagged for manual review but never rejected.

use std::ops::RangeInclusive;

/// Code points flagged for review
pub const RARE_IDEOGRAPH_RANGE: RangeInclusive<u32> = 0x20000..=0x2FFFF;

/// Returns true if `text` contains a code point in [`RARE_IDEOGRAPH_RANGE`]
///
/// # Examples
///
/// ```
/// use invex::core::transform::unicode::contains_rare_ideograph;
///
/// assert!(contains_rare_ideograph("王\u{20BB7}明"));
/// assert!(!contains_rare_ideograph("王小明"));
/// ```
pub fn contains_rare_ideograph(text: &str) -> bool {
    text.chars()
        .any(|c| RARE_IDEOGRAPH_RANGE.contains(&u32::from(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_bound_detected() {
        assert!(contains_rare_ideograph("\u{20000}"));
    }

    #[test]
    fn test_just_below_lower_bound_not_detected() {
        assert!(!contains_rare_ideograph("\u{1FFFF}"));
    }

    #[test]
    fn test_upper_bound_detected() {
        assert!(contains_rare_ideograph("abc\u{2FFFF}"));
    }

    #[test]
    fn test_just_above_upper_bound_not_detected() {
        assert!(!contains_rare_ideograph("\u{30000}"));
    }

    #[test]
    fn test_empty_and_ascii() {
        assert!(!contains_rare_ideograph(""));
        assert!(!contains_rare_ideograph("Acme Trading Co."));
    }
}

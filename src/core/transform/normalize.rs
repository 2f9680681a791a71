//! Scalar normalization
//!
//! Collapses nullable driver values into the strings written to the export
//! file. Absence renders as the empty string; present values are passed through
//! untouched since trimming already happens in the extraction query.

use crate::domain::Scalar;

/// Renders a nullable scalar for output
///
/// # Examples
///
/// ```
/// use invex::core::transform::normalize::to_display;
/// use invex::domain::Scalar;
///
/// assert_eq!(to_display(&Scalar::Absent), "");
/// assert_eq!(to_display(&Scalar::from(" 12 ")), " 12 ");
/// ```
pub fn to_display(value: &Scalar) -> String {
    value.as_deref().unwrap_or_default().to_string()
}

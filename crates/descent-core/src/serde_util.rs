//! Serde helpers for float fields that may be non-finite.
//!
//! JSON has no NaN or infinity, so `serde_json` writes them as `null`. Fields
//! tagged with [`nullable_f64`] read `null` back as NaN, which keeps records
//! from degenerate runs loadable. The sign of an infinity is not recovered.

use serde::{Deserialize, Deserializer};

/// Deserializes an `f64`, mapping `null` to NaN.
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Sample {
///     #[serde(deserialize_with = "descent_core::serde_util::nullable_f64")]
///     value: f64,
/// }
///
/// let sample: Sample = serde_json::from_str(r#"{"value": null}"#).unwrap();
/// assert!(sample.value.is_nan());
/// ```
pub fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

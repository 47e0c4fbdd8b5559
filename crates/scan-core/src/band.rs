//! Threshold bands and query coercion.
//!
//! A band is the inclusive intensity range `[center - distance, center + distance]`.
//! Query fields arrive from a browser slider and may be numbers or numeric
//! strings; [`LooseNumber`] coerces them the way a loosely typed client
//! expects (`""` is 0, garbage is NaN). A NaN bound matches nothing, so a
//! malformed number yields an empty result instead of a rejected request.

use std::fmt;
use std::ops::RangeInclusive;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Inclusive intensity band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower bound (`center - distance`).
    pub min: f64,
    /// Upper bound (`center + distance`).
    pub max: f64,
}

impl Band {
    /// Band centered on `center` extending `distance` both ways.
    #[inline]
    pub fn around(center: f64, distance: f64) -> Self {
        Self {
            min: center - distance,
            max: center + distance,
        }
    }

    /// Inclusive membership test. Always false when a bound is NaN.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Integer sample values matched by this band, clipped to `0..=max_sample`.
    ///
    /// Returns `None` when nothing can match: a NaN bound, an inverted band
    /// (negative distance), or a band entirely outside the sample range.
    pub fn sample_range(&self, max_sample: u32) -> Option<RangeInclusive<u32>> {
        if self.min.is_nan() || self.max.is_nan() {
            return None;
        }
        let lo = self.min.ceil().max(0.0);
        let hi = self.max.floor().min(max_sample as f64);
        if lo > hi {
            return None;
        }
        Some(lo as u32..=hi as u32)
    }
}

/// A threshold query against one stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdQuery {
    /// Stack name (file stem).
    pub image: String,
    /// Band center (pixel weight).
    pub center: f64,
    /// Band half-width.
    pub distance: f64,
}

impl ThresholdQuery {
    /// Creates a query.
    pub fn new(image: impl Into<String>, center: f64, distance: f64) -> Self {
        Self {
            image: image.into(),
            center,
            distance,
        }
    }

    /// The band this query selects.
    #[inline]
    pub fn band(&self) -> Band {
        Band::around(self.center, self.distance)
    }
}

/// Body of `POST /api`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Band half-width.
    #[serde(default)]
    pub distance: LooseNumber,
    /// Stack name. A number is taken by its decimal form, so `0` names `0.tif`.
    #[serde(default, deserialize_with = "loose_name")]
    pub image_name: Option<String>,
    /// Band center.
    #[serde(default)]
    pub pixel_weight: LooseNumber,
}

impl FilterRequest {
    /// Converts the wire body into a query.
    ///
    /// Numbers are never rejected; only a missing or unsafe stack name is.
    pub fn into_query(self) -> Result<ThresholdQuery> {
        let image = self
            .image_name
            .ok_or_else(|| Error::Validation("imageName is required".into()))?;
        validate_stack_name(&image)?;
        Ok(ThresholdQuery::new(image, self.pixel_weight.0, self.distance.0))
    }
}

impl From<&ThresholdQuery> for FilterRequest {
    fn from(query: &ThresholdQuery) -> Self {
        Self {
            distance: LooseNumber(query.distance),
            image_name: Some(query.image.clone()),
            pixel_weight: LooseNumber(query.center),
        }
    }
}

/// Rejects names that could escape the stack directory.
pub fn validate_stack_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("stack name is empty".into()));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(Error::Validation(format!("invalid stack name: {name:?}")));
    }
    Ok(())
}

/// A number coerced from any JSON scalar.
///
/// Missing fields default to NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LooseNumber(pub f64);

impl Default for LooseNumber {
    fn default() -> Self {
        Self(f64::NAN)
    }
}

impl From<f64> for LooseNumber {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl Serialize for LooseNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for LooseNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(LooseNumberVisitor { element: false })
    }
}

/// `element` is set while coercing the single item of an array, where a
/// boolean stringifies to `"true"`/`"false"` and so becomes NaN.
#[derive(Clone, Copy)]
struct LooseNumberVisitor {
    element: bool,
}

impl<'de> DeserializeSeed<'de> for LooseNumberVisitor {
    type Value = LooseNumber;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<LooseNumber, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for LooseNumberVisitor {
    type Value = LooseNumber;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, numeric string, boolean or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(v as f64))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<LooseNumber, E> {
        if self.element {
            return Ok(LooseNumber(f64::NAN));
        }
        Ok(LooseNumber(if v { 1.0 } else { 0.0 }))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(coerce_str(v)))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(0.0))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<LooseNumber, E> {
        Ok(LooseNumber(0.0))
    }

    /// An array coerces through its string form: `[]` is 0, `[x]` is `x`,
    /// anything longer is NaN.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<LooseNumber, A::Error> {
        let Some(first) = seq.next_element_seed(LooseNumberVisitor { element: true })? else {
            return Ok(LooseNumber(0.0));
        };
        if seq.next_element::<IgnoredAny>()?.is_none() {
            return Ok(first);
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LooseNumber(f64::NAN))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<LooseNumber, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LooseNumber(f64::NAN))
    }
}

fn loose_name<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    deserializer.deserialize_any(LooseNameVisitor)
}

struct LooseNameVisitor;

impl<'de> Visitor<'de> for LooseNameVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a stack name or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        // 3.0 prints as "3"
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }
}

/// Coerces a string to a number: trimmed, empty is 0, unparsable is NaN.
///
/// Accepts decimal and exponent literals, `Infinity`, and `0x`/`0o`/`0b`
/// integer prefixes.
pub fn coerce_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|v| v as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // Rust accepts "inf"/"nan" spellings that a slider value never produces.
    if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn band_bounds() {
        let band = Band::around(200.0, 20.0);
        assert_relative_eq!(band.min, 180.0);
        assert_relative_eq!(band.max, 220.0);
        let band = Band::around(0.3, 0.1);
        assert_relative_eq!(band.min, 0.2, epsilon = 1e-12);
        assert_relative_eq!(band.max, 0.4, epsilon = 1e-12);
        assert!(band.contains(180.0));
        assert!(band.contains(220.0));
        assert!(!band.contains(221.0));
    }

    #[test]
    fn sample_range_clips_to_depth() {
        assert_eq!(Band::around(250.0, 20.0).sample_range(255), Some(230..=255));
        assert_eq!(Band::around(5.0, 20.0).sample_range(255), Some(0..=25));
        assert_eq!(Band::around(10.5, 0.2).sample_range(255), None);
        assert_eq!(Band::around(10.0, 0.5).sample_range(255), Some(10..=10));
    }

    #[test]
    fn sample_range_empty_cases() {
        assert_eq!(Band::around(100.0, -1.0).sample_range(255), None);
        assert_eq!(Band::around(1000.0, 10.0).sample_range(255), None);
        assert_eq!(Band::around(f64::NAN, 10.0).sample_range(255), None);
        assert_eq!(Band::around(-50.0, 10.0).sample_range(255), None);
    }

    #[test]
    fn infinite_distance_covers_everything() {
        let band = Band::around(0.0, f64::INFINITY);
        assert_eq!(band.sample_range(65535), Some(0..=65535));
    }

    #[test]
    fn string_coercion() {
        assert_eq!(coerce_str("42"), 42.0);
        assert_relative_eq!(coerce_str("  7.5 "), 7.5);
        assert_relative_eq!(coerce_str(".1e-1"), 0.01);
        assert_eq!(coerce_str(""), 0.0);
        assert_eq!(coerce_str("1e2"), 100.0);
        assert_eq!(coerce_str("0x1f"), 31.0);
        assert_eq!(coerce_str("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_str("abc").is_nan());
        assert!(coerce_str("inf").is_nan());
        assert!(coerce_str("12px").is_nan());
    }

    #[test]
    fn request_accepts_strings_and_numbers() {
        let req: FilterRequest = serde_json::from_str(
            r#"{"distance": "20", "imageName": "0", "pixelWeight": 204}"#,
        )
        .unwrap();
        let query = req.into_query().unwrap();
        assert_eq!(query, ThresholdQuery::new("0", 204.0, 20.0));
    }

    #[test]
    fn request_garbage_numbers_become_nan() {
        let req: FilterRequest =
            serde_json::from_str(r#"{"distance": [1, 2], "imageName": "a", "pixelWeight": "x"}"#)
                .unwrap();
        let query = req.into_query().unwrap();
        assert!(query.center.is_nan());
        assert!(query.distance.is_nan());
        assert_eq!(query.band().sample_range(255), None);
    }

    #[test]
    fn arrays_coerce_like_their_string_form() {
        let parse = |json: &str| serde_json::from_str::<LooseNumber>(json).unwrap().0;
        assert_eq!(parse("[]"), 0.0);
        assert_eq!(parse("[1]"), 1.0);
        assert_eq!(parse(r#"[" 25 "]"#), 25.0);
        assert_eq!(parse("[[7]]"), 7.0);
        assert_eq!(parse("[null]"), 0.0);
        assert!(parse("[true]").is_nan());
        assert!(parse("[1, 2]").is_nan());
        assert!(parse("{}").is_nan());
        assert_eq!(parse("true"), 1.0);
    }

    #[test]
    fn numeric_image_name() {
        let name = |json: &str| serde_json::from_str::<FilterRequest>(json).unwrap().image_name;
        assert_eq!(name(r#"{"imageName": 0}"#).as_deref(), Some("0"));
        assert_eq!(name(r#"{"imageName": 12}"#).as_deref(), Some("12"));
        assert_eq!(name(r#"{"imageName": 3.0}"#).as_deref(), Some("3"));
        assert_eq!(name(r#"{"imageName": "b"}"#).as_deref(), Some("b"));
        assert_eq!(name(r#"{"imageName": null}"#), None);
        assert_eq!(name("{}"), None);
        assert!(serde_json::from_str::<FilterRequest>(r#"{"imageName": true}"#).is_err());

        let query = serde_json::from_str::<FilterRequest>(r#"{"imageName": 2, "pixelWeight": 5}"#)
            .unwrap()
            .into_query()
            .unwrap();
        assert_eq!(query.image, "2");
    }

    #[test]
    fn request_missing_fields() {
        let req: FilterRequest = serde_json::from_str(r#"{"imageName": "a"}"#).unwrap();
        assert!(req.distance.0.is_nan());

        let req: FilterRequest = serde_json::from_str(r#"{"distance": null}"#).unwrap();
        assert_eq!(req.distance.0, 0.0);
        assert!(matches!(req.into_query(), Err(Error::Validation(_))));
    }

    #[test]
    fn stack_names_cannot_escape() {
        assert!(validate_stack_name("scan_01").is_ok());
        assert!(validate_stack_name("a.b").is_ok());
        assert!(validate_stack_name("").is_err());
        assert!(validate_stack_name("..").is_err());
        assert!(validate_stack_name("../etc/passwd").is_err());
        assert!(validate_stack_name("dir\\file").is_err());
    }
}

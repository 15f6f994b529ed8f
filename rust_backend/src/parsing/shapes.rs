//! Declarative payload shape detection.
//!
//! Each transformer declares a [`ShapeTable`] mapping structural matchers to
//! its own shape enum and dispatches on the detected variant. Rules are
//! evaluated in declaration order; the first match wins.

use serde_json::Value;

use super::payload::Payload;

/// A structural test against a payload.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Every segment of the path exists and all but the last are objects.
    Path(&'static [&'static str]),
    /// At least one of the keys is present at the top level.
    AnyKey(&'static [&'static str]),
    /// The path exists and its value is an object.
    ObjectAt(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, payload: &Payload) -> bool {
        match self {
            Matcher::Path(path) => lookup(payload, path).is_some(),
            Matcher::AnyKey(keys) => keys.iter().any(|k| payload.contains_key(*k)),
            Matcher::ObjectAt(path) => lookup(payload, path).is_some_and(Value::is_object),
        }
    }
}

/// Ordered list of `(matcher, variant)` rules.
///
/// # Examples
///
/// ```
/// use snowops::parsing::{normalize_payload, DecodeMode, Matcher, ShapeTable};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Fuel { Level, Raw }
///
/// const FUEL: ShapeTable<Fuel> = ShapeTable::new(&[
///     (Matcher::AnyKey(&["fuel_level"]), Fuel::Level),
///     (Matcher::AnyKey(&["diesel", "gasoline"]), Fuel::Raw),
/// ]);
///
/// let payload = normalize_payload(Some(r#"{"diesel": 120}"#), DecodeMode::Flat);
/// assert_eq!(FUEL.detect(&payload), Some(Fuel::Raw));
/// ```
#[derive(Debug)]
pub struct ShapeTable<S: 'static> {
    rules: &'static [(Matcher, S)],
}

impl<S: Copy + 'static> ShapeTable<S> {
    pub const fn new(rules: &'static [(Matcher, S)]) -> Self {
        Self { rules }
    }

    /// Return the variant of the first rule whose matcher matches.
    pub fn detect(&self, payload: &Payload) -> Option<S> {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(payload))
            .map(|(_, shape)| *shape)
    }
}

/// Walk a key path through nested objects.
pub fn lookup<'a>(payload: &'a Payload, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = payload.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

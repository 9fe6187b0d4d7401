use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from a missing field.
///
/// Combined with `#[serde(default)]`, a missing field becomes `None`, `null` becomes `Some(None)` and a value becomes
/// `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Decodes `null` as the type's default value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decodes an `ExposedPorts` object.
///
/// The API reports each port with an empty object as its value; a string value is kept as an
/// explicit URL for the port.
pub(crate) fn exposed_ports<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ports = nullable::<_, BTreeMap<String, serde_json::Value>>(deserializer)?;
    Ok(ports
        .into_iter()
        .map(|(port, value)| (port, value.as_str().map(str::to_string)))
        .collect())
}

/*!
 * Serde utilities for ledger payloads.
 *
 * The chaincode marshals Go maps and slices, which encode as `null` when they
 * were never initialised. These helpers decide explicitly which fields may
 * treat `null` as empty and which must fail.
 */

use serde::{Deserialize, Deserializer};

/// Deserialize a value whose `null` encoding means "empty".
///
/// Only use this for collections where an empty value is a legitimate ledger
/// state (for example a session with no bids yet). Fields that drive
/// endorsement, such as the participant organization list, must not use it.
///
/// # Usage with serde
///
/// ```rust
/// use serde::Deserialize;
/// use std::collections::BTreeMap;
/// use gepx_client::utils::serde::deserialize_null_as_default;
///
/// #[derive(Deserialize)]
/// struct Session {
///     #[serde(default, deserialize_with = "deserialize_null_as_default")]
///     bids: BTreeMap<String, u64>,
/// }
///
/// let session: Session = serde_json::from_str(r#"{"bids": null}"#).unwrap();
/// assert!(session.bids.is_empty());
/// ```
pub fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

//! JSON documents kept in the device-local key-value store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use storage::repository::KeyValueStore;

use crate::error::LocalDataError;

/// Read a document, falling back to `T::default()` when the key is missing
/// or holds unreadable JSON.
pub(crate) async fn load_or_default<T>(kv: &dyn KeyValueStore, key: &str) -> Result<T, LocalDataError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = kv.get(key).await? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, %err, "discarding unreadable local data");
            Ok(T::default())
        }
    }
}

pub(crate) async fn save<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), LocalDataError> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::model::Preferences;
    use storage::repository::InMemoryKeyValueStore;

    #[tokio::test]
    async fn missing_and_corrupt_values_load_defaults() {
        let kv = InMemoryKeyValueStore::new();
        let prefs: Preferences = load_or_default(&kv, "app_storage").await.unwrap();
        assert!(prefs.dark_mode);

        kv.set("app_storage", "{not json").await.unwrap();
        let prefs: Preferences = load_or_default(&kv, "app_storage").await.unwrap();
        assert_eq!(prefs, Preferences::default());
    }
}

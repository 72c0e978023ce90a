use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};

/// Computes the next value of a key from its current one. `None` keeps the
/// stored value as it is.
pub type Update<'a> = dyn FnMut(Option<String>) -> anyhow::Result<Option<String>> + Send + 'a;

/// Keyed text storage for user preferences. Last write wins.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Read-modify-write of one key. No other `update` or `set` of the same
    /// key lands between the read and the write.
    async fn update(&self, key: &str, f: &mut Update<'_>) -> anyhow::Result<()>;
}

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut entries = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);

        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);

        Ok(())
    }

    async fn update(&self, key: &str, f: &mut Update<'_>) -> anyhow::Result<()> {
        let mut entries = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = f(entries.get(key).cloned())? {
            entries.insert(key.to_owned(), value);
        }

        Ok(())
    }
}

/// Reads a JSON collection. A missing key or an unreadable value is an empty
/// collection.
pub(crate) async fn load<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> anyhow::Result<T> {
    let raw = store.get(key).await?;

    Ok(decode(key, raw.as_deref()))
}

fn decode<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unreadable preference value");
            T::default()
        }
    }
}

/// Changes a JSON collection in place through [`KeyValueStore::update`].
/// `f` returns `None` to leave the collection unwritten, and that `None` is
/// passed back to the caller.
pub(crate) async fn modify<T, R>(
    store: &dyn KeyValueStore,
    key: &str,
    f: impl FnOnce(&mut T) -> Option<R> + Send,
) -> anyhow::Result<Option<R>>
where
    T: Serialize + DeserializeOwned + Default,
    R: Send,
{
    let mut f = Some(f);
    let mut output = None;

    store
        .update(key, &mut |raw: Option<String>| -> anyhow::Result<Option<String>> {
            let Some(f) = f.take() else {
                return Ok(None);
            };

            let mut value: T = decode(key, raw.as_deref());
            match f(&mut value) {
                Some(result) => {
                    output = Some(result);
                    Ok(Some(serde_json::to_string(&value)?))
                }
                None => Ok(None),
            }
        })
        .await?;

    Ok(output)
}

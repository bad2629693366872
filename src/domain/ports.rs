use crate::utils::error::Result;

/// Session-scoped key/value storage, the persistence boundary of the store.
///
/// Implementations back the cache envelope and the legacy fallback keys.
/// Storage is always accessed asynchronously; backends that are actually
/// synchronous (like the in-memory adapter) just return ready futures.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

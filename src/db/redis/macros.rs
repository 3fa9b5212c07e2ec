/// Cache-or-fetch helper.
///
/// Looks the key up first; on a miss, awaits the given fetch future, queues
/// the result for the background cache writer, and returns it. The fetch
/// must be a call to a function returning `AppResult` so the error type is
/// fixed by its signature. The cache must expose `get_from_cache` and
/// `set_in_background`.
///
/// # Arguments
/// * `$cache`: cache instance used for lookup and storage.
/// * `$key`: cache key for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future computing the value on a miss.
#[macro_export]
macro_rules! with_cache {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}

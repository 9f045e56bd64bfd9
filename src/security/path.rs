//! Subpath validation.
//!
//! # Responsibilities
//! - Reject traversal segments (`..`, `.`) and empty segments
//! - Reject segments containing a path separator
//! - Join accepted segments into a single relative path
//!
//! # Design Decisions
//! - Pure function: the same segments always give the same answer
//! - Returns `None` instead of an error so callers answer 404 without detail
//! - Memoized through a bounded LRU; purity makes concurrent reuse safe

use std::num::NonZeroUsize;
use std::path::MAIN_SEPARATOR;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

/// Default number of memoized validations.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

const INSECURE_SEGMENTS: &[&str] = &["..", ".", ""];

fn contains_separator(segment: &str) -> bool {
    segment.contains('/') || segment.contains(MAIN_SEPARATOR)
}

/// Validate subpath segments and join them with `/`.
///
/// Returns `None` when any segment could escape the document root.
pub fn secure_path<S: AsRef<str>>(segments: &[S]) -> Option<String> {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        if INSECURE_SEGMENTS.contains(&segment) || contains_separator(segment) {
            return None;
        }
        if i > 0 {
            joined.push('/');
        }
        joined.push_str(segment);
    }
    Some(joined)
}

/// Bounded, thread-safe memo over [`secure_path`].
#[derive(Debug)]
pub struct SecurePathCache {
    inner: Mutex<LruCache<Vec<String>, Option<String>>>,
}

impl SecurePathCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Validate `segments`, answering from the cache when possible.
    pub fn validate(&self, segments: &[String]) -> Option<String> {
        // A poisoned lock still holds pure results, so keep using it.
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(segments) {
            return hit.clone();
        }
        let result = secure_path(segments);
        cache.put(segments.to_vec(), result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SecurePathCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rejects_traversal_segments() {
        assert_eq!(secure_path(&["..", "etc", "passwd"]), None);
        assert_eq!(secure_path(&["js", ".", "app.js"]), None);
        assert_eq!(secure_path(&["js", "", "app.js"]), None);
        assert_eq!(secure_path(&["js", ".."]), None);
    }

    #[test]
    fn test_rejects_embedded_separator() {
        assert_eq!(secure_path(&["js/app.js"]), None);
        assert_eq!(secure_path(&["a", "/etc"]), None);
        let native = format!("a{}b", MAIN_SEPARATOR);
        assert_eq!(secure_path(&[native.as_str()]), None);
    }

    #[test]
    fn test_joins_clean_segments() {
        assert_eq!(secure_path(&["js", "app.js"]), Some("js/app.js".to_string()));
        assert_eq!(secure_path(&["logo.png"]), Some("logo.png".to_string()));
        // Dots inside a name are fine.
        assert_eq!(secure_path(&["..hidden", "a..b"]), Some("..hidden/a..b".to_string()));
    }

    #[test]
    fn test_cache_matches_pure_function() {
        let cache = SecurePathCache::default();
        let good = segs(&["css", "site.css"]);
        let bad = segs(&["css", "..", "secret"]);

        assert_eq!(cache.validate(&good), secure_path(&good));
        assert_eq!(cache.validate(&good), Some("css/site.css".to_string()));
        assert_eq!(cache.validate(&bad), None);
        assert_eq!(cache.validate(&bad), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_is_bounded() {
        let cache = SecurePathCache::new(NonZeroUsize::new(2).unwrap());
        cache.validate(&segs(&["a"]));
        cache.validate(&segs(&["b"]));
        cache.validate(&segs(&["c"]));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.validate(&segs(&["a"])), Some("a".to_string()));
    }
}

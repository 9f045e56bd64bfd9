//! Cache regions and cache-key derivation.
//!
//! A cache region only namespaces keys; nothing here stores anything.

use std::fmt;
use std::str::FromStr;

use axum::http::request::Parts;

use crate::error::AssetError;

/// Identity used for `user` keys when the resolver has no answer.
pub const GUEST_IDENTITY: &str = "__guest__";

/// Partition for cache keys and ETags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    Global,
    User,
}

impl CacheRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheRegion::Global => "global",
            CacheRegion::User => "user",
        }
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheRegion {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(CacheRegion::Global),
            "user" => Ok(CacheRegion::User),
            other => Err(AssetError::UnknownCacheRegion(other.to_string())),
        }
    }
}

/// Resolves the identity that partitions `user`-region keys.
pub trait UsernameResolver: Send + Sync {
    fn resolve(&self, request: &Parts) -> Option<String>;
}

impl<F> UsernameResolver for F
where
    F: Fn(&Parts) -> Option<String> + Send + Sync,
{
    fn resolve(&self, request: &Parts) -> Option<String> {
        self(request)
    }
}

/// Build a cache key for `key` in `region`.
///
/// `resolver` is only consulted for [`CacheRegion::User`]; asking for a user
/// key without one fails with [`AssetError::IdentityUnavailable`].
pub fn cache_key(
    region: CacheRegion,
    key: &str,
    resolver: Option<&dyn UsernameResolver>,
    request: &Parts,
) -> Result<String, AssetError> {
    match region {
        CacheRegion::Global => Ok(format!("cache:global:{}", key)),
        CacheRegion::User => {
            let resolver = resolver.ok_or(AssetError::IdentityUnavailable)?;
            let username = resolver
                .resolve(request)
                .unwrap_or_else(|| GUEST_IDENTITY.to_string());
            Ok(format!("cache:user:{}:{}", username, key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_user(user: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(user) = user {
            builder = builder.header("x-user", user);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn header_user(parts: &Parts) -> Option<String> {
        parts
            .headers
            .get("x-user")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("global".parse::<CacheRegion>().unwrap(), CacheRegion::Global);
        assert_eq!("user".parse::<CacheRegion>().unwrap(), CacheRegion::User);
        assert!(matches!(
            "session".parse::<CacheRegion>(),
            Err(AssetError::UnknownCacheRegion(r)) if r == "session"
        ));
        assert_eq!(CacheRegion::User.to_string(), "user");
    }

    #[test]
    fn test_global_key_ignores_identity() {
        let parts = parts_with_user(Some("alice"));
        let key = cache_key(CacheRegion::Global, "pkg:a.css", None, &parts).unwrap();
        assert_eq!(key, "cache:global:pkg:a.css");
    }

    #[test]
    fn test_user_key_uses_identity_or_guest() {
        let alice = parts_with_user(Some("alice"));
        let anon = parts_with_user(None);
        let resolver: &dyn UsernameResolver = &header_user;

        let key = cache_key(CacheRegion::User, "k", Some(resolver), &alice).unwrap();
        assert_eq!(key, "cache:user:alice:k");

        let key = cache_key(CacheRegion::User, "k", Some(resolver), &anon).unwrap();
        assert_eq!(key, "cache:user:__guest__:k");
    }

    #[test]
    fn test_user_key_requires_resolver() {
        let parts = parts_with_user(None);
        assert!(matches!(
            cache_key(CacheRegion::User, "k", None, &parts),
            Err(AssetError::IdentityUnavailable)
        ));
    }
}

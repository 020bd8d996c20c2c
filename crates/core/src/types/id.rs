//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All entity IDs are
//! strings, matching their persisted JSON representation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use farine_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("usr_1");
/// let order_id = OrderId::new("ORD-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);

impl UserId {
    /// Sentinel ID used for orders placed without an active session.
    #[must_use]
    pub fn guest() -> Self {
        Self::new("usr_guest")
    }

    /// Generate a fresh user ID.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(format!("usr_{}", uuid::Uuid::new_v4().simple()))
    }
}

impl OrderId {
    /// Generate a fresh, human-displayable order ID.
    ///
    /// The ID embeds the creation time as base-36 millis, so IDs sort by
    /// creation, plus a short random suffix to stay unique within a
    /// millisecond.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
        let mut rng = rand::rng();
        let suffix: String = (0..4)
            .map(|_| (rng.sample(rand::distr::Alphanumeric) as char).to_ascii_uppercase())
            .collect();
        Self::new(format!("ORD-{}{suffix}", to_base36(millis)))
    }
}

/// A monotonically assigned toast message ID.
///
/// Unlike entity IDs, toast IDs are numeric: they only need to be unique
/// within one process lifetime and are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(u64);

impl ToastId {
    /// Create a toast ID from a raw counter value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode a number as uppercase base-36.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while n > 0 {
        let digit = usize::try_from(n % 36).unwrap_or(0);
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base36_zero() {
        assert_eq!(to_base36(0), "0");
    }

    #[test]
    fn test_base36_round_values() {
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn test_order_id_format() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ORD-"));
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        );
    }

    #[test]
    fn test_order_ids_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_id_generate() {
        let id = UserId::generate();
        assert!(id.as_str().starts_with("usr_"));
        assert_ne!(id, UserId::generate());
    }

    #[test]
    fn test_guest_sentinel_stable() {
        assert_eq!(UserId::guest(), UserId::new("usr_guest"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("croissant");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"croissant\"");
        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}

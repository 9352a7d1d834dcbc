use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for category keys and fragment ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Class token that marks a node as a symbol reference.
pub const SYMBOL_MARKER: &str = "symbol";

/// Interned category key, e.g. `a-person` or `eye`.
/// A `Spur` handle into the shared interner, so copies and comparisons are cheap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryKey(Spur);

impl CategoryKey {
    /// Intern a key string as-is.
    pub fn intern(s: &str) -> Self {
        CategoryKey(INTERNER.get_or_intern(s))
    }

    /// Build the canonical key from a node's class tokens: every token
    /// except the symbol marker, sorted, joined with `-`.
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut parts: Vec<&str> = tokens
            .into_iter()
            .filter(|t| *t != SYMBOL_MARKER)
            .collect();
        parts.sort_unstable();
        Self::intern(&parts.join("-"))
    }

    /// Resolve back to the key string.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

/// Interned fragment id, unique within its category (e.g. `bust`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(Spur);

impl FragmentId {
    /// Intern a fragment id string.
    pub fn intern(s: &str) -> Self {
        FragmentId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to the id string.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

macro_rules! interned_string_impls {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        /// Orders by string content, not interning order.
        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($ty::intern(&s))
            }
        }
    };
}

interned_string_impls!(CategoryKey);
interned_string_impls!(FragmentId);

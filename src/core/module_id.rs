//! Interned module identifiers.
//!
//! Module names are compared and hashed constantly during graph traversal,
//! so every name is interned once in a process-wide table. A `ModuleId` is a
//! `Copy` handle whose equality is a pointer comparison.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{LazyLock, RwLock};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

static NAMES: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// A module name that cannot be used as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidModuleId {
    #[error("module name is empty")]
    Empty,

    #[error("module name `{0}` contains whitespace or a path separator")]
    BadCharacter(String),
}

/// Unique name of a module in the registry.
///
/// Ordering follows the string content, never the interning order, so
/// sorted collections of ids are stable across runs.
#[derive(Clone, Copy)]
pub struct ModuleId {
    name: &'static str,
}

impl ModuleId {
    /// Intern a module name without validating it.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();

        {
            let names = NAMES.read().expect("module name table poisoned");
            if let Some(&interned) = names.get(name) {
                return ModuleId { name: interned };
            }
        }

        let mut names = NAMES.write().expect("module name table poisoned");
        if let Some(&interned) = names.get(name) {
            return ModuleId { name: interned };
        }

        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        names.insert(leaked);
        ModuleId { name: leaked }
    }

    /// Intern a module name read from a descriptor, rejecting names that
    /// could not appear in a dependency list.
    pub fn parse(name: &str) -> Result<Self, InvalidModuleId> {
        if name.is_empty() {
            return Err(InvalidModuleId::Empty);
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        {
            return Err(InvalidModuleId::BadCharacter(name.to_string()));
        }
        Ok(ModuleId::new(name))
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.name
    }
}

impl Deref for ModuleId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.name
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        self.name
    }
}

impl PartialEq for ModuleId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.name, other.name)
    }
}

impl Eq for ModuleId {}

impl PartialEq<str> for ModuleId {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for ModuleId {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialOrd for ModuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name)
    }
}

impl Hash for ModuleId {
    // Must agree with `Borrow<str>`, so hash the content, not the pointer.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.name, f)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name, f)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        ModuleId::new(s)
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        ModuleId::new(s)
    }
}

impl Serialize for ModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ModuleId::parse(&s).map_err(de::Error::custom)
    }
}

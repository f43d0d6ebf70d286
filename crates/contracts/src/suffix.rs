//! InstanceSuffix - scene namespace disambiguation
//!
//! The simulator renames duplicate model objects by appending `#0`, `#1`, ...
//! The first copy keeps its plain names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Fixed suffix pool, in allocation order
pub const SUFFIXES: [&str; 11] = ["", "#0", "#1", "#2", "#3", "#4", "#5", "#6", "#7", "#8", "#9"];

/// Suffix identifying one robot instance inside the shared scene.
///
/// Always one of [`SUFFIXES`]; copying is free.
///
/// # Examples
/// ```
/// use contracts::InstanceSuffix;
///
/// let primary = InstanceSuffix::PRIMARY;
/// assert!(primary.is_primary());
/// assert_eq!(primary.apply("youBot"), "youBot");
///
/// let second: InstanceSuffix = "#0".parse().unwrap();
/// assert_eq!(second.apply("youBot"), "youBot#0");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceSuffix(&'static str);

impl InstanceSuffix {
    /// Unsuffixed (first) instance
    pub const PRIMARY: InstanceSuffix = InstanceSuffix("");

    /// Suffix at `slot` in the fixed pool order
    pub fn from_slot(slot: usize) -> Option<Self> {
        SUFFIXES.get(slot).map(|s| Self(*s))
    }

    /// Position in the fixed pool order
    pub fn slot(&self) -> usize {
        SUFFIXES
            .iter()
            .position(|s| *s == self.0)
            .unwrap_or_default()
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.0.is_empty()
    }

    /// Append this suffix to a base object name
    pub fn apply(&self, base: &str) -> String {
        format!("{base}{}", self.0)
    }
}

impl Default for InstanceSuffix {
    fn default() -> Self {
        Self::PRIMARY
    }
}

impl Deref for InstanceSuffix {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl std::str::FromStr for InstanceSuffix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUFFIXES
            .iter()
            .find(|candidate| **candidate == s)
            .map(|candidate| Self(*candidate))
            .ok_or_else(|| format!("'{s}' is not a valid instance suffix"))
    }
}

impl fmt::Display for InstanceSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for InstanceSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceSuffix({:?})", self.0)
    }
}

impl Serialize for InstanceSuffix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for InstanceSuffix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allocator over the first `capacity` entries of [`SUFFIXES`].
///
/// A suffix stays held until released; allocation always returns the first
/// free entry in pool order.
#[derive(Debug, Clone)]
pub struct SuffixPool {
    held: Vec<bool>,
}

impl SuffixPool {
    /// Full pool (11 suffixes)
    pub fn standard() -> Self {
        Self::with_capacity(SUFFIXES.len())
    }

    /// Pool restricted to the first `capacity` suffixes (clamped to 11)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            held: vec![false; capacity.min(SUFFIXES.len())],
        }
    }

    pub fn capacity(&self) -> usize {
        self.held.len()
    }

    /// Number of suffixes currently held
    pub fn held_count(&self) -> usize {
        self.held.iter().filter(|h| **h).count()
    }

    pub fn is_held(&self, suffix: InstanceSuffix) -> bool {
        self.held.get(suffix.slot()).copied().unwrap_or(false)
    }

    /// Take the first free suffix, `None` once the pool is exhausted
    pub fn allocate(&mut self) -> Option<InstanceSuffix> {
        let slot = self.held.iter().position(|h| !*h)?;
        self.held[slot] = true;
        InstanceSuffix::from_slot(slot)
    }

    /// Return a suffix to the pool (no-op if not held)
    pub fn release(&mut self, suffix: InstanceSuffix) {
        if let Some(h) = self.held.get_mut(suffix.slot()) {
            *h = false;
        }
    }

    /// Release every suffix
    pub fn clear(&mut self) {
        self.held.iter_mut().for_each(|h| *h = false);
    }
}

impl Default for SuffixPool {
    fn default() -> Self {
        Self::standard()
    }
}

//! Raw validation status reported by the license engine.
//!
//! The engine returns a bitmask of independent conditions. Several bits can
//! be set at once (an expired demo key carries both `DEMO` and `EXPIRED`);
//! turning the mask into a single decision is the interpreter's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A set of condition flags reported by the license engine for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationStatus(u32);

impl ValidationStatus {
    /// The key could not be decoded or its signature does not match.
    pub const KEY_INVALID: Self = Self(1 << 0);
    /// The key belongs to a different product.
    pub const PRODUCT_INVALID: Self = Self(1 << 1);
    /// The key is bound to a different machine.
    pub const MACHINE_INVALID: Self = Self(1 << 2);
    /// The key is in use on more machines than it allows.
    pub const EXCEEDED_INSTANCES: Self = Self(1 << 3);
    /// The key content was modified after signing.
    pub const TAMPERED: Self = Self(1 << 4);
    /// The key is valid for a different product version.
    pub const VERSION_INVALID: Self = Self(1 << 5);
    /// The key is a time-limited evaluation key.
    pub const DEMO: Self = Self(1 << 6);
    /// The key's validity period has ended.
    pub const EXPIRED: Self = Self(1 << 7);
    /// The key does not expire.
    pub const PERMANENT: Self = Self(1 << 8);

    /// Flags that make a key unusable regardless of anything else set.
    pub const REJECTING: Self = Self(
        Self::KEY_INVALID.0
            | Self::PRODUCT_INVALID.0
            | Self::MACHINE_INVALID.0
            | Self::EXCEEDED_INSTANCES.0
            | Self::TAMPERED.0,
    );

    const NAMED: [(Self, &'static str); 9] = [
        (Self::KEY_INVALID, "key_invalid"),
        (Self::PRODUCT_INVALID, "product_invalid"),
        (Self::MACHINE_INVALID, "machine_invalid"),
        (Self::EXCEEDED_INSTANCES, "exceeded_instances"),
        (Self::TAMPERED, "tampered"),
        (Self::VERSION_INVALID, "version_invalid"),
        (Self::DEMO, "demo"),
        (Self::EXPIRED, "expired"),
        (Self::PERMANENT, "permanent"),
    ];

    /// Returns a status with no flags set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a status from raw engine bits. Unknown bits are kept.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns true if no flags are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag in `other` is set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Returns true if any flag in `other` is set.
    #[must_use]
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Returns the names of the known flags that are set, in priority order.
    #[must_use]
    pub fn flag_names(&self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for ValidationStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValidationStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.flag_names();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

impl FromStr for ValidationStatus {
    type Err = crate::Error;

    /// Parses the `Display` form, e.g. `demo|expired`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "none" {
            return Ok(Self::empty());
        }

        let mut status = Self::empty();
        for part in s.split('|') {
            let part = part.trim();
            let flag = Self::NAMED
                .iter()
                .find(|(_, name)| *name == part)
                .map(|(flag, _)| *flag)
                .ok_or_else(|| crate::Error::UnknownFlag(part.to_string()))?;
            status.insert(flag);
        }
        Ok(status)
    }
}

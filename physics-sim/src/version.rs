//! World version parsing and comparison for [`crate::features::FeatureSet`].

/// A semver-like Minecraft version, e.g. `1.14.4`.
///
/// Comparison is purely numeric on the `(major, minor, patch)` triple; two
/// versions that differ only in a missing patch component (`1.14` vs
/// `1.14.0`) compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GameVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl GameVersion {
    /// Parses a dotted version string. Missing trailing components default
    /// to zero; non-numeric components also default to zero rather than
    /// failing, since a malformed version is a construction-time concern
    /// handled by the caller validating its own config, not this parser.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Self { major, minor, patch }
    }

    /// The `major.minor` pair rendered as `"1.14"`, matching the reference
    /// client's notion of "major version" used by bare-string feature
    /// conditions.
    #[must_use]
    pub fn major_version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    #[must_use]
    pub fn gt(&self, other: &str) -> bool {
        *self > Self::parse(other)
    }

    #[must_use]
    pub fn gte(&self, other: &str) -> bool {
        *self >= Self::parse(other)
    }

    #[must_use]
    pub fn lt(&self, other: &str) -> bool {
        *self < Self::parse(other)
    }

    #[must_use]
    pub fn lte(&self, other: &str) -> bool {
        *self <= Self::parse(other)
    }

    #[must_use]
    pub fn eq_version(&self, other: &str) -> bool {
        *self == Self::parse(other)
    }
}

//! Version-gated feature flags (spec §3 `FeatureSet`, §6 `features.json`
//! format).

use std::collections::HashSet;

use serde::Deserialize;

use crate::version::GameVersion;

/// A single condition atom: either a bare major-version string (`"1.14"`,
/// matched against [`GameVersion::major_version`]) or a predicate condition
/// (`"> 1.14"`, matched against the full numeric version).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    BareMajor(String),
    Gt(String),
    Gte(String),
    Lt(String),
    Lte(String),
    Eq(String),
}

impl Atom {
    fn parse(raw: &str) -> Result<Self, crate::error::FeatureParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(crate::error::FeatureParseError::Empty);
        }
        for (predicate, ctor) in [
            (">=", Atom::Gte as fn(String) -> Atom),
            ("<=", Atom::Lte as fn(String) -> Atom),
            ("==", Atom::Eq as fn(String) -> Atom),
            (">", Atom::Gt as fn(String) -> Atom),
            ("<", Atom::Lt as fn(String) -> Atom),
        ] {
            if let Some(rest) = raw.strip_prefix(predicate) {
                let version = rest.trim();
                if version.is_empty() {
                    return Err(crate::error::FeatureParseError::MalformedVersion(raw.to_string()));
                }
                return Ok(ctor(version.to_string()));
            }
        }
        // A bare major-version string is always digits (`"1.14"`); anything
        // starting with a comparison-like character that didn't match one of
        // the recognized predicates above is a typo'd condition, not a
        // version number.
        if raw.starts_with(['<', '>', '=', '!', '~']) {
            return Err(crate::error::FeatureParseError::UnknownPredicate(raw.to_string()));
        }
        Ok(Atom::BareMajor(raw.to_string()))
    }

    fn matches(&self, version: GameVersion) -> bool {
        match self {
            Atom::BareMajor(s) => version.major_version() == *s,
            Atom::Gt(s) => version.gt(s),
            Atom::Gte(s) => version.gte(s),
            Atom::Lt(s) => version.lt(s),
            Atom::Lte(s) => version.lte(s),
            Atom::Eq(s) => version.eq_version(s),
        }
    }
}

/// One OR-branch: an AND-list of atoms, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Condition(Vec<Atom>);

impl Condition {
    fn matches(&self, version: GameVersion) -> bool {
        self.0.iter().all(|atom| atom.matches(version))
    }
}

/// Raw `features.json` shape: `Condition ::= string | string[]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCondition {
    Single(String),
    And(Vec<String>),
}

/// One `{name, versions}` entry from `features.json`.
#[derive(Debug, Deserialize)]
pub struct FeatureDefinition {
    pub name: String,
    versions: Vec<RawCondition>,
}

/// A resolved, immutable set of enabled feature names for one world version.
///
/// Built once per `(features, version)` pair and shared thereafter — see
/// spec §5 (catalogue/feature set are immutable after construction).
#[derive(Debug, Clone)]
pub struct FeatureSet {
    enabled: HashSet<String>,
}

impl FeatureSet {
    /// Resolves every feature definition against `version`, OR-reducing its
    /// `versions` list of AND-conditions.
    ///
    /// # Errors
    /// Returns a [`crate::error::FeatureParseError`] if any condition string
    /// uses an unrecognized predicate or omits its version operand.
    pub fn new(
        features: &[FeatureDefinition],
        version: GameVersion,
    ) -> Result<Self, crate::error::FeatureParseError> {
        let mut enabled = HashSet::new();
        for feature in features {
            let mut any = false;
            for raw in &feature.versions {
                let condition = match raw {
                    RawCondition::Single(s) => Condition(vec![Atom::parse(s)?]),
                    RawCondition::And(parts) => {
                        let atoms = parts
                            .iter()
                            .map(|p| Atom::parse(p))
                            .collect::<Result<Vec<_>, _>>()?;
                        Condition(atoms)
                    }
                };
                if condition.matches(version) {
                    any = true;
                    break;
                }
            }
            if any {
                enabled.insert(feature.name.clone());
            }
        }
        Ok(Self { enabled })
    }

    /// Parses `features.json` contents and resolves against `version` in
    /// one step.
    ///
    /// # Errors
    /// Propagates JSON deserialization failures and the same parse errors as
    /// [`FeatureSet::new`].
    pub fn from_json(
        json: &str,
        version: GameVersion,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let defs: Vec<FeatureDefinition> = serde_json::from_str(json)?;
        Ok(Self::new(&defs, version)?)
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

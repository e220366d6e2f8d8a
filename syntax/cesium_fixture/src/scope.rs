//! TextMate scope identifiers.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Error when a string cannot be used as a scope identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("scope identifier is empty")]
    Empty,
    #[error("scope identifier `{0}` contains whitespace")]
    Whitespace(String),
    #[error("scope identifier `{0}` has an empty segment")]
    EmptySegment(String),
}

/// A dot-separated scope identifier such as `entity.name.type.cesium`.
///
/// Comparison is plain string comparison. Cloning is a refcount bump, so
/// token streams can share the same scope values.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(Arc<str>);

impl Scope {
    pub fn new(name: &str) -> Result<Self, ScopeError> {
        if name.is_empty() {
            return Err(ScopeError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ScopeError::Whitespace(name.to_string()));
        }
        if name.split('.').any(str::is_empty) {
            return Err(ScopeError::EmptySegment(name.to_string()));
        }
        Ok(Scope(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the dotted segments (`entity`, `name`, `type`, `cesium`).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// TextMate prefix match: `string` is a prefix of `string.quoted`,
    /// but `str` is not.
    pub fn is_prefix_of(&self, other: &Scope) -> bool {
        match other.as_str().strip_prefix(self.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({})", self.0)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::new(s)
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The set of scopes applying at one position.
///
/// Ordered so that reports and comparisons are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    pub fn new() -> Self {
        ScopeSet::default()
    }

    pub fn insert(&mut self, scope: Scope) -> bool {
        self.0.insert(scope)
    }

    pub fn remove(&mut self, scope: &Scope) -> bool {
        self.0.remove(scope)
    }

    pub fn contains(&self, scope: &Scope) -> bool {
        self.0.contains(scope)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.iter()
    }

    /// Every scope in `expected` is present.
    pub fn is_superset_of(&self, expected: &[Scope]) -> bool {
        expected.iter().all(|s| self.0.contains(s))
    }

    /// Scopes of `expected` that are not present, in the order given.
    pub fn missing<'a>(&self, expected: &'a [Scope]) -> Vec<&'a Scope> {
        expected.iter().filter(|s| !self.0.contains(*s)).collect()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        ScopeSet(iter.into_iter().collect())
    }
}

impl Extend<Scope> for ScopeSet {
    fn extend<I: IntoIterator<Item = Scope>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ScopeSet {
    type Item = &'a Scope;
    type IntoIter = std::collections::btree_set::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        for (i, scope) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(scope.as_str())?;
        }
        Ok(())
    }
}

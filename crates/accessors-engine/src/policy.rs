//! Policy kinds and declared policy sets
//!
//! A [`PolicySet`] records, for each of the six policy kinds, whether a
//! declaration exists and what it says. Keeping "undeclared" apart from
//! "declared false" is what lets a derived class or a property fall back
//! to its parent's declaration only when it says nothing itself.

use std::fmt;

/// The access-control axes a declaration can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Reads (and existence checks) are allowed
    Get,
    /// Writes are allowed
    Set,
    /// Unsets are allowed
    Delete,
    /// Value transform applied on write
    Mutator,
    /// Property names match case-insensitively
    CaseInsensitive,
    /// Property can never be unset
    Immutable,
}

impl PolicyKind {
    /// Every kind, in storage order
    pub const ALL: [PolicyKind; 6] = [
        PolicyKind::Get,
        PolicyKind::Set,
        PolicyKind::Delete,
        PolicyKind::Mutator,
        PolicyKind::CaseInsensitive,
        PolicyKind::Immutable,
    ];

    fn index(self) -> usize {
        match self {
            PolicyKind::Get => 0,
            PolicyKind::Set => 1,
            PolicyKind::Delete => 2,
            PolicyKind::Mutator => 3,
            PolicyKind::CaseInsensitive => 4,
            PolicyKind::Immutable => 5,
        }
    }

    /// Name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Get => "get",
            PolicyKind::Set => "set",
            PolicyKind::Delete => "delete",
            PolicyKind::Mutator => "mutator",
            PolicyKind::CaseInsensitive => "icase",
            PolicyKind::Immutable => "immutable",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value carried by a declared policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyValue {
    /// Boolean switch (get, set, delete, icase, immutable)
    Bool(bool),
    /// Mutator reference
    Str(String),
    /// Declared but explicitly empty (a mutator of `""`)
    Null,
}

/// Per-kind declarations; `None` means undeclared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySet {
    entries: [Option<PolicyValue>; 6],
}

impl PolicySet {
    /// Create an empty set (nothing declared)
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration, replacing any earlier one for the same kind
    pub fn declare(&mut self, kind: PolicyKind, value: PolicyValue) {
        self.entries[kind.index()] = Some(value);
    }

    /// Builder form of [`declare`](Self::declare)
    pub fn with(mut self, kind: PolicyKind, value: PolicyValue) -> Self {
        self.declare(kind, value);
        self
    }

    /// Builder shortcut for a boolean declaration
    pub fn with_flag(self, kind: PolicyKind, enabled: bool) -> Self {
        self.with(kind, PolicyValue::Bool(enabled))
    }

    /// Declaration for a kind, if any
    pub fn get(&self, kind: PolicyKind) -> Option<&PolicyValue> {
        self.entries[kind.index()].as_ref()
    }

    /// Check if a kind is declared
    pub fn is_declared(&self, kind: PolicyKind) -> bool {
        self.entries[kind.index()].is_some()
    }

    /// Check if nothing at all is declared
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Merge this set over a parent: declarations here win, undeclared kinds
    /// are taken from the parent.
    pub fn merge_with_parent(&self, parent: &PolicySet) -> PolicySet {
        let mut merged = self.clone();
        for kind in PolicyKind::ALL {
            if !merged.is_declared(kind) {
                merged.entries[kind.index()] = parent.entries[kind.index()].clone();
            }
        }
        merged
    }

    /// Resolved boolean for a switch kind; undeclared resolves to `false`.
    ///
    /// A string declaration counts as enabled when non-empty.
    pub fn flag(&self, kind: PolicyKind) -> bool {
        match self.get(kind) {
            Some(PolicyValue::Bool(b)) => *b,
            Some(PolicyValue::Str(s)) => !s.is_empty(),
            Some(PolicyValue::Null) | None => false,
        }
    }

    /// Resolved mutator reference; undeclared or explicitly empty is `None`
    pub fn mutator(&self) -> Option<&str> {
        match self.get(PolicyKind::Mutator) {
            Some(PolicyValue::Str(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undeclared_differs_from_false() {
        let set = PolicySet::new().with_flag(PolicyKind::Get, false);
        assert!(set.is_declared(PolicyKind::Get));
        assert!(!set.is_declared(PolicyKind::Set));
        assert!(!set.flag(PolicyKind::Get));
        assert!(!set.flag(PolicyKind::Set));
    }

    #[test]
    fn test_merge_child_declaration_wins() {
        let parent = PolicySet::new()
            .with_flag(PolicyKind::Get, true)
            .with_flag(PolicyKind::Set, true);
        let child = PolicySet::new().with_flag(PolicyKind::Set, false);

        let merged = child.merge_with_parent(&parent);
        assert!(merged.flag(PolicyKind::Get));
        assert!(!merged.flag(PolicyKind::Set));
        assert!(merged.is_declared(PolicyKind::Set));
        assert!(!merged.is_declared(PolicyKind::Delete));
    }

    #[test]
    fn test_explicit_empty_mutator_blocks_parent() {
        let parent = PolicySet::new().with(PolicyKind::Mutator, PolicyValue::Str("trim".into()));
        let child = PolicySet::new().with(PolicyKind::Mutator, PolicyValue::Null);

        assert_eq!(parent.mutator(), Some("trim"));
        assert_eq!(child.merge_with_parent(&parent).mutator(), None);
        assert_eq!(PolicySet::new().merge_with_parent(&parent).mutator(), Some("trim"));
    }

    #[test]
    fn test_is_empty() {
        assert!(PolicySet::new().is_empty());
        assert!(!PolicySet::new().with_flag(PolicyKind::Immutable, true).is_empty());
    }
}

//! Policy merging
//!
//! Class-level declarations are folded down the inheritance chain, root
//! first: at every step the current class's own declarations win and
//! anything it leaves undeclared is inherited from the running result.
//! Property declarations are then merged over the fully merged class
//! policy the same way, and whatever is still undeclared falls back to
//! `false` (or no mutator).

use crate::policy::{PolicyKind, PolicySet};

/// One step of the class chain fold: `own` declarations over the merged
/// policy of the parent class
pub fn inherit_class_policy(parent: &PolicySet, own: &PolicySet) -> PolicySet {
    own.merge_with_parent(parent)
}

/// Final switches and mutator reference for one property
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPolicy {
    /// Reads and existence checks allowed
    pub gettable: bool,
    /// Writes allowed
    pub settable: bool,
    /// Unsets allowed (still blocked when `immutable`)
    pub unsettable: bool,
    /// Unsets always refused
    pub immutable: bool,
    /// Name matches case-insensitively
    pub case_insensitive: bool,
    /// Raw mutator reference, before placeholder substitution
    pub mutator: Option<String>,
}

/// Merge a property's own declarations over its class policy
pub fn resolve_property(class_policy: &PolicySet, property_policy: &PolicySet) -> ResolvedPolicy {
    let merged = property_policy.merge_with_parent(class_policy);

    ResolvedPolicy {
        gettable: merged.flag(PolicyKind::Get),
        settable: merged.flag(PolicyKind::Set),
        unsettable: merged.flag(PolicyKind::Delete),
        immutable: merged.flag(PolicyKind::Immutable),
        case_insensitive: merged.flag(PolicyKind::CaseInsensitive),
        mutator: merged.mutator().map(str::to_string),
    }
}

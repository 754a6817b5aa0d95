//! Declaration sources
//!
//! The engine never looks at declaration syntax. A [`DeclarationSource`]
//! turns whatever front-end a class uses into plain [`PolicySet`]s, one
//! for the class and one per property. [`AttributeSource`] reads the
//! [`Attr`] lists stored on [`ClassDef`] and [`PropertyDef`].

use crate::attr::Attr;
use crate::class::{ClassDef, PropertyDef};
use crate::error::AccessorResult;
use crate::policy::{PolicyKind, PolicySet, PolicyValue};

/// Supplies declared policies for classes and properties
pub trait DeclarationSource: Send + Sync {
    /// Policies declared on the class itself (not merged with ancestors)
    fn class_policy(&self, class: &ClassDef) -> AccessorResult<PolicySet>;

    /// Policies declared on one property (not merged with the class).
    ///
    /// `class` is the class being resolved; the property may have been
    /// declared by one of its ancestors.
    fn property_policy(&self, class: &ClassDef, property: &PropertyDef) -> AccessorResult<PolicySet>;
}

/// Reads declarations from attribute lists
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeSource;

impl DeclarationSource for AttributeSource {
    fn class_policy(&self, class: &ClassDef) -> AccessorResult<PolicySet> {
        Ok(policy_from_attributes(class.attributes()))
    }

    fn property_policy(&self, _class: &ClassDef, property: &PropertyDef) -> AccessorResult<PolicySet> {
        Ok(policy_from_attributes(&property.attributes))
    }
}

/// Convert an attribute list into a policy set.
///
/// Later attributes of the same kind replace earlier ones. An attribute
/// whose switch is `None` leaves its kind undeclared.
pub fn policy_from_attributes(attributes: &[Attr]) -> PolicySet {
    let mut set = PolicySet::new();

    for attr in attributes {
        match attr {
            Attr::Get(enabled) => declare_switch(&mut set, PolicyKind::Get, *enabled),
            Attr::Set { enabled, mutator } => {
                declare_switch(&mut set, PolicyKind::Set, *enabled);
                if let Some(mutator) = mutator {
                    declare_mutator(&mut set, mutator);
                }
            }
            Attr::Delete(enabled) => declare_switch(&mut set, PolicyKind::Delete, *enabled),
            Attr::Mutator(mutator) => declare_mutator(&mut set, mutator),
            Attr::ICase => set.declare(PolicyKind::CaseInsensitive, PolicyValue::Bool(true)),
            Attr::Immutable => set.declare(PolicyKind::Immutable, PolicyValue::Bool(true)),
        }
    }

    set
}

fn declare_switch(set: &mut PolicySet, kind: PolicyKind, enabled: Option<bool>) {
    if let Some(enabled) = enabled {
        set.declare(kind, PolicyValue::Bool(enabled));
    }
}

fn declare_mutator(set: &mut PolicySet, mutator: &str) {
    let value = if mutator.is_empty() {
        PolicyValue::Null
    } else {
        PolicyValue::Str(mutator.to_string())
    };
    set.declare(PolicyKind::Mutator, value);
}

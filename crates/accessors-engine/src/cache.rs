//! Class policy cache
//!
//! Resolved per-class configuration, computed on first access and kept for
//! the life of the cache. Entries are keyed by class identity, so two
//! definitions that happen to share a name never share a configuration.
//! Population happens outside the map so two threads resolving the same
//! class at once may both compute it; the first insert wins and both
//! callers get the stored value.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use crate::class::{ClassDef, Visibility};
use crate::index::AccessIndex;
use crate::mutator::MutatorRef;
use crate::overrides::{AccessorOp, OverrideMethods};
use crate::policy::PolicySet;

/// Final, resolved configuration of one property
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// Declared name
    pub name: String,
    /// Class that declared the property
    pub declaring_class: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Reads and existence checks allowed
    pub gettable: bool,
    /// Writes allowed
    pub settable: bool,
    /// Unsets allowed unless `immutable`
    pub unsettable: bool,
    /// Unsets always refused
    pub immutable: bool,
    /// Any case variant of the name resolves to this property
    pub case_insensitive: bool,
    /// Value transform applied on writes without an override
    pub mutator: Option<MutatorRef>,
    /// Hand-written methods taking over operations
    pub overrides: OverrideMethods,
}

impl PropertyDescriptor {
    /// Check if the property is public (never managed)
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Override method for `op`, if any
    pub fn override_for(&self, op: AccessorOp) -> Option<&str> {
        self.overrides.get(op)
    }
}

/// Identity of a class definition.
///
/// Every cache entry holds the class it was built from, so an address is
/// never reused while its entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassKey(usize);

impl ClassKey {
    /// Key of `class`
    pub fn of(class: &Arc<ClassDef>) -> Self {
        Self(Arc::as_ptr(class) as usize)
    }
}

/// Resolved configuration of one class
#[derive(Debug)]
pub struct ClassConf {
    class: Arc<ClassDef>,
    policy: Arc<PolicySet>,
    properties: FxHashMap<String, PropertyDescriptor>,
    index: AccessIndex,
}

impl ClassConf {
    /// Assemble a class configuration from resolved properties
    pub fn new(
        class: Arc<ClassDef>,
        policy: Arc<PolicySet>,
        properties: Vec<PropertyDescriptor>,
    ) -> Self {
        let index = AccessIndex::build(properties.iter().map(|p| p.name.as_str()));
        let properties = properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        Self {
            class,
            policy,
            properties,
            index,
        }
    }

    /// Class name
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Class this configuration was resolved for
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Merged class-level policy
    pub fn policy(&self) -> &PolicySet {
        &self.policy
    }

    /// Property by exact name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Look a property up the way dispatch does: exact name first, then
    /// any case variant when that property allows it.
    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        if let Some(exact) = self.properties.get(name) {
            return Some(exact);
        }
        let canonical = self.index.resolve(name)?;
        self.properties
            .get(canonical)
            .filter(|descriptor| descriptor.case_insensitive)
    }

    /// All resolved properties
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Case-insensitive name index
    pub fn index(&self) -> &AccessIndex {
        &self.index
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the class has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Process-wide store of resolved classes
#[derive(Default)]
pub struct PolicyCache {
    /// Merged class-level policy of every class seen on a chain
    class_policies: DashMap<ClassKey, (Arc<ClassDef>, Arc<PolicySet>)>,
    /// Fully resolved classes
    classes: DashMap<ClassKey, Arc<ClassConf>>,
}

impl PolicyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved configuration of a class
    pub fn get(&self, class: &Arc<ClassDef>) -> Option<Arc<ClassConf>> {
        self.classes
            .get(&ClassKey::of(class))
            .map(|entry| entry.clone())
    }

    /// Store a resolved class; if another thread got there first its
    /// value is kept and returned.
    pub fn insert(&self, conf: ClassConf) -> Arc<ClassConf> {
        let key = ClassKey::of(conf.class());
        self.classes
            .entry(key)
            .or_insert_with(|| Arc::new(conf))
            .clone()
    }

    /// Merged class-level policy of a class
    pub fn class_policy(&self, class: &Arc<ClassDef>) -> Option<Arc<PolicySet>> {
        self.class_policies
            .get(&ClassKey::of(class))
            .map(|entry| Arc::clone(&entry.1))
    }

    /// Store a merged class-level policy, first insert wins
    pub fn insert_class_policy(&self, class: &Arc<ClassDef>, policy: PolicySet) -> Arc<PolicySet> {
        let entry = self
            .class_policies
            .entry(ClassKey::of(class))
            .or_insert_with(|| (Arc::clone(class), Arc::new(policy)));
        Arc::clone(&entry.1)
    }

    /// Number of fully resolved classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class was resolved yet
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Drop everything
    pub fn clear(&self) {
        self.classes.clear();
        self.class_policies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyKind;

    fn descriptor(name: &str, case_insensitive: bool) -> PropertyDescriptor {
        PropertyDescriptor {
            name: name.to_string(),
            declaring_class: "A".to_string(),
            visibility: Visibility::Protected,
            gettable: true,
            settable: false,
            unsettable: false,
            immutable: false,
            case_insensitive,
            mutator: None,
            overrides: OverrideMethods::default(),
        }
    }

    fn class(name: &str) -> Arc<ClassDef> {
        ClassDef::builder(name).build()
    }

    #[test]
    fn test_find_exact_and_case_insensitive() {
        let conf = ClassConf::new(
            class("A"),
            Arc::new(PolicySet::new()),
            vec![descriptor("strict", false), descriptor("loose", true)],
        );

        assert!(conf.find("strict").is_some());
        assert!(conf.find("STRICT").is_none());
        assert_eq!(conf.find("LOOSE").map(|d| d.name.as_str()), Some("loose"));
        assert!(conf.find("other").is_none());
        assert_eq!(conf.len(), 2);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = PolicyCache::new();
        let a = class("A");
        let first = cache.insert(ClassConf::new(
            Arc::clone(&a),
            Arc::new(PolicySet::new()),
            vec![descriptor("x", false)],
        ));
        let second = cache.insert(ClassConf::new(Arc::clone(&a), Arc::new(PolicySet::new()), vec![]));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_same_name_different_class() {
        let cache = PolicyCache::new();
        let first = class("A");
        let second = class("A");
        cache.insert(ClassConf::new(
            Arc::clone(&first),
            Arc::new(PolicySet::new()),
            vec![descriptor("x", false)],
        ));

        assert!(cache.get(&first).is_some());
        assert!(cache.get(&second).is_none());

        cache.insert(ClassConf::new(Arc::clone(&second), Arc::new(PolicySet::new()), vec![]));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&first).map(|conf| conf.len()), Some(1));
        assert_eq!(cache.get(&second).map(|conf| conf.len()), Some(0));
    }

    #[test]
    fn test_class_policies() {
        let cache = PolicyCache::new();
        let a = class("A");
        assert!(cache.class_policy(&a).is_none());

        let policy = PolicySet::new().with_flag(PolicyKind::Get, true);
        cache.insert_class_policy(&a, policy);
        assert!(cache.class_policy(&a).unwrap().flag(PolicyKind::Get));
        assert!(cache.class_policy(&class("A")).is_none());

        cache.clear();
        assert!(cache.class_policy(&a).is_none());
        assert!(cache.is_empty());
    }
}

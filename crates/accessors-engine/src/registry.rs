//! Class and free-function registries
//!
//! Class-qualified mutator references (`Other::normalize`) are looked up in
//! the [`ClassRegistry`]; bare-name references (`trim`) in the
//! [`FunctionRegistry`]. Both are safe to share between threads.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::class::{ClassDef, StaticFn};
use crate::error::AccessorResult;
use crate::value::Value;

/// Registry of classes by name
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<String, Arc<ClassDef>>>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any class with the same name
    pub fn register(&self, class: &Arc<ClassDef>) {
        self.classes
            .write()
            .insert(class.name().to_string(), Arc::clone(class));
    }

    /// Get a class by name
    pub fn get(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.read().get(name).cloned()
    }

    /// Check if a class is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

/// Registry of free functions by name
#[derive(Default)]
pub struct FunctionRegistry {
    functions: RwLock<FxHashMap<String, Arc<StaticFn>>>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function by name
    pub fn register(
        &self,
        name: &str,
        function: impl Fn(&[Value]) -> AccessorResult<Value> + Send + Sync + 'static,
    ) {
        self.functions
            .write()
            .insert(name.to_string(), Arc::new(function));
    }

    /// Get a function by name
    pub fn get(&self, name: &str) -> Option<Arc<StaticFn>> {
        self.functions.read().get(name).cloned()
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_registry() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());

        let class = ClassDef::builder("Thing").build();
        registry.register(&class);

        assert!(registry.contains("Thing"));
        assert!(!registry.contains("thing"));
        assert_eq!(registry.get("Thing").unwrap().name(), "Thing");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_function_registry() {
        let registry = FunctionRegistry::new();
        registry.register("double", |args| {
            Ok(Value::Int(args.first().and_then(Value::as_int).unwrap_or(0) * 2))
        });

        assert!(registry.contains("double"));
        assert!(!registry.contains("triple"));

        let f = registry.get("double").unwrap();
        assert_eq!(f(&[Value::Int(21)]).unwrap(), Value::Int(42));
    }
}

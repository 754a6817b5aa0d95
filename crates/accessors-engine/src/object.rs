//! Host objects
//!
//! An [`Instance`] is a class plus raw field storage. The raw field
//! operations here bypass every policy; the dispatcher in
//! [`crate::dispatch`] is the managed path.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::class::{ClassDef, MethodBody};
use crate::error::{AccessorError, AccessorResult};
use crate::value::Value;

/// An object of some [`ClassDef`]
#[derive(Clone)]
pub struct Instance {
    class: Arc<ClassDef>,
    /// Absent key = never assigned or unset
    fields: FxHashMap<String, Value>,
}

impl Instance {
    /// Create an instance, assigning declared initial values
    pub fn new(class: &Arc<ClassDef>) -> Self {
        let mut fields = FxHashMap::default();
        for (_, property) in class.visible_properties() {
            if let Some(value) = &property.initial_value {
                fields.insert(property.name.clone(), value.clone());
            }
        }
        Self {
            class: Arc::clone(class),
            fields,
        }
    }

    /// The instance's class
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Name of the instance's class
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Check if the instance's class is `name` or derives from it
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class.is_a(name)
    }

    /// Raw field read; `Null` if the field holds nothing
    pub fn field(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Raw field read by reference
    pub fn field_ref(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check if the field currently holds a non-null value
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| !v.is_null())
    }

    /// Raw field write
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Raw field removal, returning what was stored
    pub fn unset_field(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Call a method declared on the class or an ancestor
    pub fn call_method(&mut self, name: &str, args: &[Value]) -> AccessorResult<Value> {
        let body = match self.class.find_method(name) {
            Some(method) => method.body.clone(),
            None => {
                return Err(AccessorError::UnknownMethod {
                    class: self.class.name().to_string(),
                    method: name.to_string(),
                })
            }
        };

        match body {
            MethodBody::Instance(f) => f(self, args),
            MethodBody::Static(f) => f(args),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.class.name() == other.class.name() && self.fields == other.fields
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("fields", &self.fields)
            .finish()
    }
}

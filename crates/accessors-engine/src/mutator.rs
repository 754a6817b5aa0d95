//! Mutator references
//!
//! A mutator transforms a written value before it is stored. It is
//! declared as a string and resolved once per class into a [`MutatorRef`].
//! Accepted forms, after the placeholder has been replaced by the
//! property name:
//!
//! | Form                         | Target                                  |
//! |------------------------------|-----------------------------------------|
//! | `$this->m`, `this->m`, `this.m` | method `m` of the object being written |
//! | `f`                          | free function `f`                       |
//! | `self::m`, `static::m`       | method `m` of the resolved class        |
//! | `parent::m`                  | method `m` of the resolved class's parent |
//! | `Other::m`                   | static method `m` of class `Other`      |
//!
//! Instance-bound and `static::` references bind late: the method is
//! looked up again on the runtime class of the object being written, so a
//! derived class can replace it.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::class::{ClassDef, MethodBody, StaticFn};
use crate::error::{AccessorError, AccessorResult};
use crate::object::Instance;
use crate::registry::{ClassRegistry, FunctionRegistry};
use crate::value::Value;

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

const THIS_PREFIXES: [&str; 3] = ["$this->", "this->", "this."];

/// Scope of a class-qualified reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `self::`
    SelfClass,
    /// `static::`, re-resolved on the runtime class
    Static,
    /// `parent::`
    Parent,
    /// An explicit class name
    Named,
}

impl Scope {
    fn binds_receiver(self) -> bool {
        !matches!(self, Scope::Named)
    }
}

/// What a resolved mutator calls
#[derive(Clone)]
pub enum MutatorTarget {
    /// Method of the object being written
    Bound {
        /// Method name
        method: String,
    },
    /// Registered free function
    Function {
        /// Function name
        name: String,
        /// Function body
        body: Arc<StaticFn>,
    },
    /// Class-qualified method
    Scoped {
        /// How the class was named
        scope: Scope,
        /// Class the reference was validated against
        class: Arc<ClassDef>,
        /// Method name
        method: String,
    },
}

impl fmt::Debug for MutatorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutatorTarget::Bound { method } => {
                f.debug_struct("Bound").field("method", method).finish()
            }
            MutatorTarget::Function { name, .. } => {
                f.debug_struct("Function").field("name", name).finish()
            }
            MutatorTarget::Scoped { scope, class, method } => f
                .debug_struct("Scoped")
                .field("scope", scope)
                .field("class", &class.name())
                .field("method", method)
                .finish(),
        }
    }
}

/// A resolved, validated mutator
#[derive(Debug, Clone)]
pub struct MutatorRef {
    reference: String,
    target: MutatorTarget,
}

/// Replace every occurrence of `placeholder` in `raw` with `property`
pub fn substitute(raw: &str, placeholder: &str, property: &str) -> String {
    if placeholder.is_empty() {
        return raw.to_string();
    }
    raw.replace(placeholder, property)
}

/// Lookup context for resolving references
pub struct ResolveContext<'a> {
    /// Class whose properties are being resolved
    pub class: &'a Arc<ClassDef>,
    /// Known classes for `Other::m`
    pub classes: &'a ClassRegistry,
    /// Known free functions
    pub functions: &'a FunctionRegistry,
}

impl MutatorRef {
    /// Parse and validate a reference for `property`.
    ///
    /// The placeholder is substituted first. The referenced member must
    /// exist now; whether it can actually be called on a given object is
    /// only checked by [`MutatorRef::invoke`].
    pub fn resolve(
        ctx: &ResolveContext<'_>,
        property: &str,
        raw: &str,
        placeholder: &str,
    ) -> AccessorResult<MutatorRef> {
        let reference = substitute(raw.trim(), placeholder, property);
        let invalid = || AccessorError::InvalidMutatorReference {
            class: ctx.class.name().to_string(),
            property: property.to_string(),
            reference: reference.clone(),
        };

        if let Some(method) = THIS_PREFIXES
            .iter()
            .find_map(|prefix| reference.strip_prefix(prefix))
        {
            if !IDENT_RE.is_match(method) || !ctx.class.has_method(method) {
                return Err(invalid());
            }
            let target = MutatorTarget::Bound {
                method: method.to_string(),
            };
            return Ok(MutatorRef { reference, target });
        }

        if let Some((scope_name, method)) = reference.split_once("::") {
            if !IDENT_RE.is_match(method) {
                return Err(invalid());
            }

            let (scope, class) = match scope_name.to_ascii_lowercase().as_str() {
                "self" => (Scope::SelfClass, Arc::clone(ctx.class)),
                "static" => (Scope::Static, Arc::clone(ctx.class)),
                "parent" => match ctx.class.parent() {
                    Some(parent) => (Scope::Parent, Arc::clone(parent)),
                    None => return Err(invalid()),
                },
                _ => {
                    if !IDENT_RE.is_match(scope_name) {
                        return Err(invalid());
                    }
                    let named = ctx.classes.get(scope_name).ok_or_else(invalid)?;
                    (Scope::Named, named)
                }
            };

            if !class.has_method(method) {
                return Err(invalid());
            }
            let target = MutatorTarget::Scoped {
                scope,
                class,
                method: method.to_string(),
            };
            return Ok(MutatorRef { reference, target });
        }

        if !IDENT_RE.is_match(&reference) {
            return Err(invalid());
        }
        let body = ctx.functions.get(&reference).ok_or_else(invalid)?;
        let target = MutatorTarget::Function {
            name: reference.clone(),
            body,
        };
        Ok(MutatorRef { reference, target })
    }

    /// Reference after placeholder substitution
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Resolved target
    pub fn target(&self) -> &MutatorTarget {
        &self.target
    }

    /// Transform `value` for a write to `object`
    pub fn invoke(&self, object: &mut Instance, value: Value) -> AccessorResult<Value> {
        let args = [value];

        match &self.target {
            MutatorTarget::Bound { method } => {
                if !object.class().has_method(method) {
                    return Err(self.not_callable(object, "method not found on the object's class"));
                }
                object.call_method(method, &args)
            }
            MutatorTarget::Function { body, .. } => body(&args),
            MutatorTarget::Scoped {
                scope,
                class,
                method,
            } => {
                let found = if *scope == Scope::Static {
                    object.class().find_method(method)
                } else {
                    class.find_method(method)
                };
                let body = match found {
                    Some(def) => def.body.clone(),
                    None => {
                        return Err(self.not_callable(object, "method not found"));
                    }
                };

                match body {
                    MethodBody::Static(f) => f(&args),
                    MethodBody::Instance(f) => {
                        if !scope.binds_receiver() {
                            return Err(self.not_callable(
                                object,
                                &format!("{}::{}() is not static", class.name(), method),
                            ));
                        }
                        if !object.is_instance_of(class.name()) {
                            return Err(self.not_callable(
                                object,
                                &format!("object is not an instance of {}", class.name()),
                            ));
                        }
                        f(object, &args)
                    }
                }
            }
        }
    }

    fn not_callable(&self, object: &Instance, reason: &str) -> AccessorError {
        AccessorError::MutatorNotCallable {
            class: object.class_name().to_string(),
            reference: self.reference.clone(),
            reason: reason.to_string(),
        }
    }
}

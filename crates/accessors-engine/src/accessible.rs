//! Conventional accessor method names
//!
//! Maps calls like `getName()`, `setName(v)`, `issetName()`,
//! `unsetName()` and `withName(v)` onto the dispatcher. The method name is
//! case-insensitive and so is the property part: it is looked up through
//! the class's lower-case index first and used as written otherwise.
//!
//! ```rust,ignore
//! let mut user = Instance::new(&user_class);
//! user.call_accessor("setName", &[Value::str("ann")])?;
//! let name = user.call_accessor("getName", &[])?.into_value();
//! ```

use crate::dispatch::{Accessors, SetterKind};
use crate::error::{AccessorError, AccessorResult};
use crate::object::Instance;
use crate::overrides::{split_accessor_name, AccessorOp};
use crate::value::Value;

/// Outcome of a conventional accessor call
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// `get`/`isset` result
    Value(Value),
    /// `set`/`unset`, or a `with` that kept the receiver; continue with it
    This,
    /// `with` produced a new receiver
    Instance(Instance),
}

impl CallResult {
    /// The returned value, `Null` for receiver results
    pub fn into_value(self) -> Value {
        match self {
            CallResult::Value(value) => value,
            CallResult::This | CallResult::Instance(_) => Value::Null,
        }
    }

    /// The new receiver, if one was produced
    pub fn into_instance(self) -> Option<Instance> {
        match self {
            CallResult::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

/// An object bound to an engine for conventional accessor calls
pub struct Bound<'a> {
    engine: &'a Accessors,
    object: &'a mut Instance,
}

impl Accessors {
    /// Bind `object` for conventional accessor calls
    pub fn bind<'a>(&'a self, object: &'a mut Instance) -> Bound<'a> {
        Bound {
            engine: self,
            object,
        }
    }
}

impl Bound<'_> {
    /// Call a conventional accessor method by name
    pub fn call(&mut self, method: &str, args: &[Value]) -> AccessorResult<CallResult> {
        let Some((op, rest)) = split_accessor_name(method) else {
            return Err(self.unknown_method(method));
        };

        let expected = match op {
            AccessorOp::Set | AccessorOp::With => 1,
            AccessorOp::Get | AccessorOp::Isset | AccessorOp::Unset => 0,
        };
        if args.len() != expected {
            return Err(AccessorError::ArgumentCount {
                class: self.object.class_name().to_string(),
                method: method.to_string(),
                expected,
                actual: args.len(),
            });
        }

        let conf = self.engine.resolve(self.object.class())?;
        let property = conf.index().resolve(rest).unwrap_or(rest);

        match op {
            AccessorOp::Get => self.engine.get(self.object, property).map(CallResult::Value),
            AccessorOp::Isset => self
                .engine
                .isset(self.object, property)
                .map(|set| CallResult::Value(Value::Bool(set))),
            AccessorOp::Unset => {
                self.engine.unset(self.object, property)?;
                Ok(CallResult::This)
            }
            AccessorOp::Set => {
                self.engine
                    .set(self.object, SetterKind::Set, property, args[0].clone())?;
                Ok(CallResult::This)
            }
            AccessorOp::With => {
                let next = self
                    .engine
                    .set(self.object, SetterKind::With, property, args[0].clone())?;
                Ok(next.map_or(CallResult::This, CallResult::Instance))
            }
        }
    }

    /// Read a property through `get<Property>()`
    pub fn get(&mut self, property: &str) -> AccessorResult<Value> {
        self.engine.get(self.object, property)
    }

    /// Write a property through `set<Property>(value)`, returning the
    /// binding for chaining
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> AccessorResult<&mut Self> {
        self.engine
            .set(self.object, SetterKind::Set, property, value.into())?;
        Ok(self)
    }

    /// The bound object
    pub fn object(&self) -> &Instance {
        self.object
    }

    fn unknown_method(&self, method: &str) -> AccessorError {
        AccessorError::UnknownMethod {
            class: self.object.class_name().to_string(),
            method: method.to_string(),
        }
    }
}

/// Objects answering conventional accessor calls through the shared engine
pub trait Accessible {
    /// Call `get<Property>()`, `set<Property>(v)`, `isset<Property>()`,
    /// `unset<Property>()` or `with<Property>(v)` through
    /// [`Accessors::global`]
    fn call_accessor(&mut self, method: &str, args: &[Value]) -> AccessorResult<CallResult>;
}

impl Accessible for Instance {
    fn call_accessor(&mut self, method: &str, args: &[Value]) -> AccessorResult<CallResult> {
        Accessors::global().bind(self).call(method, args)
    }
}

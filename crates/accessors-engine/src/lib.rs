//! Declarative property accessors
//!
//! This crate mediates access to the non-public state of host objects
//! according to policies declared on classes and properties:
//! - **Policies**: get/set/delete switches, mutators, case-insensitive
//!   names and immutability (`policy`, `attr`, `source` modules)
//! - **Resolution**: inheritance merge, override detection and mutator
//!   validation, cached once per class (`merge`, `overrides`, `mutator`,
//!   `cache` modules)
//! - **Dispatch**: the generic get/set/isset/unset operations and the
//!   conventional `getX()`/`setX(v)` method layer (`dispatch`,
//!   `accessible` modules)
//!
//! # Example
//!
//! ```rust,ignore
//! use accessors_engine::{Accessors, Attr, ClassDef, Instance, PropertyDef, SetterKind, Value};
//!
//! let class = ClassDef::builder("A")
//!     .property(
//!         PropertyDef::protected("prop1")
//!             .attr(Attr::get())
//!             .attr(Attr::set_with_mutator("ucfirst"))
//!             .attr(Attr::delete()),
//!     )
//!     .build();
//!
//! let engine = Accessors::new();
//! engine.register_function("ucfirst", ucfirst);
//!
//! let mut a = Instance::new(&class);
//! engine.set(&mut a, SetterKind::Set, "prop1", Value::str("value1"))?;
//! assert_eq!(engine.get(&mut a, "prop1")?, Value::str("Value1"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod accessible;
pub mod attr;
pub mod cache;
pub mod class;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod merge;
pub mod mutator;
pub mod object;
pub mod overrides;
pub mod policy;
pub mod registry;
pub mod source;
pub mod value;

pub use accessible::{Accessible, Bound, CallResult};
pub use attr::Attr;
pub use cache::{ClassConf, ClassKey, PolicyCache, PropertyDescriptor};
pub use class::{ClassBuilder, ClassDef, MethodBody, MethodDef, PropertyDef, Visibility};
pub use config::{AccessorsConfig, ConfigError, DuplicateOverrides};
pub use dispatch::{Accessors, SetterKind};
pub use error::{AccessorError, AccessorResult};
pub use index::AccessIndex;
pub use merge::{inherit_class_policy, resolve_property, ResolvedPolicy};
pub use mutator::{MutatorRef, MutatorTarget, Scope};
pub use object::Instance;
pub use overrides::{AccessorOp, OverrideMethods};
pub use policy::{PolicyKind, PolicySet, PolicyValue};
pub use registry::{ClassRegistry, FunctionRegistry};
pub use source::{policy_from_attributes, AttributeSource, DeclarationSource};
pub use value::Value;

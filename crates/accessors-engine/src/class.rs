//! Class definitions
//!
//! A [`ClassDef`] is the static shape the engine resolves policies from:
//! its parent link, class-level attributes, declared properties and
//! declared methods. Classes are immutable once built and shared through
//! `Arc`, so the parent chain is acyclic by construction.
//!
//! ```rust,ignore
//! let base = ClassDef::builder("Base")
//!     .attr(Attr::get())
//!     .property(PropertyDef::protected("name"))
//!     .build();
//!
//! let user = ClassDef::builder("User")
//!     .extends(&base)
//!     .property(PropertyDef::protected("email").attr(Attr::set()))
//!     .method("getName", |this, _args| Ok(this.field("name")))
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use crate::attr::Attr;
use crate::error::AccessorResult;
use crate::object::Instance;
use crate::value::Value;

/// Instance method body: receives the object and the call arguments
pub type InstanceFn = dyn Fn(&mut Instance, &[Value]) -> AccessorResult<Value> + Send + Sync;

/// Static method or free function body
pub type StaticFn = dyn Fn(&[Value]) -> AccessorResult<Value> + Send + Sync;

/// Property visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Accessible directly; never managed by accessors
    Public,
    /// Visible to derived classes
    Protected,
    /// Visible to the declaring class only
    Private,
}

/// A declared property
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name (case preserved)
    pub name: String,
    /// Visibility
    pub visibility: Visibility,
    /// Accessor attributes on the property itself
    pub attributes: Vec<Attr>,
    /// Value assigned when an instance is created
    pub initial_value: Option<Value>,
}

impl PropertyDef {
    /// Create a property definition
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            attributes: Vec::new(),
            initial_value: None,
        }
    }

    /// Create a protected property
    pub fn protected(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Protected)
    }

    /// Create a private property
    pub fn private(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Private)
    }

    /// Create a public property
    pub fn public(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Public)
    }

    /// Add an attribute
    pub fn attr(mut self, attr: Attr) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Set the initial value
    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Check if the property is public
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Callable body of a method
#[derive(Clone)]
pub enum MethodBody {
    /// Bound to an instance
    Instance(Arc<InstanceFn>),
    /// Class-level, no receiver
    Static(Arc<StaticFn>),
}

/// A declared method
#[derive(Clone)]
pub struct MethodDef {
    /// Method name (case preserved)
    pub name: String,
    /// Implementation
    pub body: MethodBody,
}

impl MethodDef {
    /// Check if this is a static method
    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Static(_))
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("is_static", &self.is_static())
            .finish()
    }
}

/// Static shape of a class
pub struct ClassDef {
    name: String,
    parent: Option<Arc<ClassDef>>,
    attributes: Vec<Attr>,
    doc_comment: Option<String>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Start building a class
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct parent, if any
    pub fn parent(&self) -> Option<&Arc<ClassDef>> {
        self.parent.as_ref()
    }

    /// Class-level attributes (own declarations only)
    pub fn attributes(&self) -> &[Attr] {
        &self.attributes
    }

    /// Documentation comment, if any
    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// Properties declared directly on this class
    pub fn own_properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Methods declared directly on this class
    pub fn own_methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// The inheritance chain, root ancestor first and this class last
    pub fn chain(&self) -> Vec<&ClassDef> {
        let mut chain = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            chain.push(class);
            current = class.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Check if this class is `name` or derives from it
    pub fn is_a(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.name == name {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// Find a method by name (case-insensitive); the most-derived
    /// declaration wins.
    pub fn find_method(&self, name: &str) -> Option<&MethodDef> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(method) = class
                .methods
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(name))
            {
                return Some(method);
            }
            current = class.parent.as_deref();
        }
        None
    }

    /// Check if a method exists on this class or an ancestor
    pub fn has_method(&self, name: &str) -> bool {
        self.find_method(name).is_some()
    }

    /// Every property visible from this class: ancestors' non-private
    /// properties (root first) overlaid by this class's own declarations.
    ///
    /// Each entry carries the class that declared it.
    pub fn visible_properties(&self) -> Vec<(&ClassDef, &PropertyDef)> {
        let chain = self.chain();
        let last = chain.len() - 1;
        let mut visible: Vec<(&ClassDef, &PropertyDef)> = Vec::new();

        for (depth, class) in chain.into_iter().enumerate() {
            for property in &class.properties {
                if depth != last && property.visibility == Visibility::Private {
                    continue;
                }
                match visible.iter_mut().find(|(_, p)| p.name == property.name) {
                    Some(slot) => *slot = (class, property),
                    None => visible.push((class, property)),
                }
            }
        }

        visible
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("attributes", &self.attributes)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder for [`ClassDef`]
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<ClassDef>>,
    attributes: Vec<Attr>,
    doc_comment: Option<String>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodDef>,
}

impl ClassBuilder {
    /// Create a builder for a root class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            attributes: Vec::new(),
            doc_comment: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Derive from `parent`
    pub fn extends(mut self, parent: &Arc<ClassDef>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Add a class-level attribute
    pub fn attr(mut self, attr: Attr) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Set the documentation comment
    pub fn doc(mut self, comment: impl Into<String>) -> Self {
        self.doc_comment = Some(comment.into());
        self
    }

    /// Declare a property
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare an instance method
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> AccessorResult<Value> + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name: name.into(),
            body: MethodBody::Instance(Arc::new(body)),
        });
        self
    }

    /// Declare a static method
    pub fn static_method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> AccessorResult<Value> + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            name: name.into(),
            body: MethodBody::Static(Arc::new(body)),
        });
        self
    }

    /// Finish the class
    pub fn build(self) -> Arc<ClassDef> {
        Arc::new(ClassDef {
            name: self.name,
            parent: self.parent,
            attributes: self.attributes,
            doc_comment: self.doc_comment,
            properties: self.properties,
            methods: self.methods,
        })
    }
}

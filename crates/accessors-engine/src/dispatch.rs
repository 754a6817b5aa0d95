//! Accessor dispatch
//!
//! [`Accessors`] owns everything needed to mediate property access: the
//! declaration source, the class and function registries, and the policy
//! cache. Each operation resolves the object's class (cached after the
//! first call), looks the property up, checks the resolved policy, then
//! either delegates to an override method or touches the raw field.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::cache::{ClassConf, PolicyCache, PropertyDescriptor};
use crate::class::ClassDef;
use crate::config::AccessorsConfig;
use crate::error::{AccessorError, AccessorResult};
use crate::index::AccessIndex;
use crate::merge::{inherit_class_policy, resolve_property};
use crate::mutator::{MutatorRef, ResolveContext};
use crate::object::Instance;
use crate::overrides::{detect_overrides, AccessorOp};
use crate::policy::{PolicyKind, PolicySet};
use crate::registry::{ClassRegistry, FunctionRegistry};
use crate::source::{AttributeSource, DeclarationSource};
use crate::value::Value;

static GLOBAL: Lazy<Accessors> = Lazy::new(Accessors::new);

/// Which kind of write is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterKind {
    /// Plain write to the receiver
    Set,
    /// Fluent write; may produce a new receiver
    With,
}

impl SetterKind {
    fn op(self) -> AccessorOp {
        match self {
            SetterKind::Set => AccessorOp::Set,
            SetterKind::With => AccessorOp::With,
        }
    }
}

/// Policy resolution and dispatch service
pub struct Accessors {
    config: AccessorsConfig,
    source: Box<dyn DeclarationSource>,
    classes: ClassRegistry,
    functions: FunctionRegistry,
    cache: PolicyCache,
}

impl Default for Accessors {
    fn default() -> Self {
        Self::new()
    }
}

impl Accessors {
    /// Create an engine with default settings reading attribute declarations
    pub fn new() -> Self {
        Self::with_config(AccessorsConfig::default())
    }

    /// Create an engine with the given settings
    pub fn with_config(config: AccessorsConfig) -> Self {
        Self {
            config,
            source: Box::new(AttributeSource),
            classes: ClassRegistry::new(),
            functions: FunctionRegistry::new(),
            cache: PolicyCache::new(),
        }
    }

    /// Replace the declaration source
    pub fn with_source(mut self, source: impl DeclarationSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Shared process-wide engine
    pub fn global() -> &'static Accessors {
        &GLOBAL
    }

    /// Engine settings
    pub fn config(&self) -> &AccessorsConfig {
        &self.config
    }

    /// Known classes
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Known free functions
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Resolved class cache
    pub fn cache(&self) -> &PolicyCache {
        &self.cache
    }

    /// Register a class and its ancestors so `Class::method` mutator
    /// references can name them. A name already taken keeps its first
    /// class.
    pub fn register_class(&self, class: &Arc<ClassDef>) {
        let mut current = Some(class);
        while let Some(class) = current {
            if !self.classes.contains(class.name()) {
                self.classes.register(class);
            }
            current = class.parent();
        }
    }

    /// Register a free function usable as a bare-name mutator
    pub fn register_function(
        &self,
        name: &str,
        function: impl Fn(&[Value]) -> AccessorResult<Value> + Send + Sync + 'static,
    ) {
        self.functions.register(name, function);
    }

    /// Resolved configuration of `class`, computed on first use
    pub fn resolve(&self, class: &Arc<ClassDef>) -> AccessorResult<Arc<ClassConf>> {
        if let Some(conf) = self.cache.get(class) {
            trace!(class = class.name(), "class configuration cache hit");
            return Ok(conf);
        }

        self.register_class(class);
        let conf = self.cache.insert(self.build_conf(class)?);
        debug!(
            class = class.name(),
            properties = conf.len(),
            "resolved class configuration"
        );
        Ok(conf)
    }

    /// Merged class-level policy; every ancestor's merged policy is cached
    /// on the way down so sibling classes share the work.
    fn merged_class_policy(&self, class: &Arc<ClassDef>) -> AccessorResult<Arc<PolicySet>> {
        let mut chain = vec![Arc::clone(class)];
        while let Some(parent) = chain.last().and_then(|c| c.parent()).cloned() {
            chain.push(parent);
        }

        let mut running = Arc::new(PolicySet::new());
        for ancestor in chain.iter().rev() {
            running = match self.cache.class_policy(ancestor) {
                Some(cached) => cached,
                None => {
                    let own = self.source.class_policy(ancestor)?;
                    self.cache
                        .insert_class_policy(ancestor, inherit_class_policy(&running, &own))
                }
            };
        }

        Ok(running)
    }

    fn build_conf(&self, class: &Arc<ClassDef>) -> AccessorResult<ClassConf> {
        let class_policy = self.merged_class_policy(class)?;
        let visible = class.visible_properties();

        let names: Vec<String> = visible.iter().map(|(_, p)| p.name.clone()).collect();
        let index = AccessIndex::build(names.iter().map(String::as_str));
        let mut overrides = detect_overrides(
            class,
            &names,
            &index,
            class_policy.flag(PolicyKind::CaseInsensitive),
            self.config.duplicate_overrides,
        )?;

        let ctx = ResolveContext {
            class,
            classes: &self.classes,
            functions: &self.functions,
        };

        let mut properties = Vec::with_capacity(visible.len());
        for (declaring, property) in visible {
            let own = self.source.property_policy(class, property)?;
            let resolved = resolve_property(&class_policy, &own);

            // public properties are never managed
            let mutator = match resolved.mutator {
                Some(raw) if !property.is_public() => Some(
                    MutatorRef::resolve(&ctx, &property.name, &raw, &self.config.placeholder)?,
                ),
                _ => None,
            };

            properties.push(PropertyDescriptor {
                name: property.name.clone(),
                declaring_class: declaring.name().to_string(),
                visibility: property.visibility,
                gettable: resolved.gettable,
                settable: resolved.settable,
                unsettable: resolved.unsettable,
                immutable: resolved.immutable,
                case_insensitive: resolved.case_insensitive,
                mutator,
                overrides: overrides.remove(&property.name).unwrap_or_default(),
            });
        }

        Ok(ClassConf::new(Arc::clone(class), class_policy, properties))
    }

    /// Read a property
    pub fn get(&self, object: &mut Instance, name: &str) -> AccessorResult<Value> {
        trace!(class = object.class_name(), property = name, "get");
        let conf = self.resolve(object.class())?;
        let property = lookup(&conf, name, "get")?;

        if !property.gettable {
            return Err(violation(&conf, property, "get", "reading is not enabled"));
        }

        if let Some(method) = property.override_for(AccessorOp::Get) {
            return object.call_method(method, &[]);
        }

        Ok(object.field(&property.name))
    }

    /// Check whether a property currently holds a value
    pub fn isset(&self, object: &mut Instance, name: &str) -> AccessorResult<bool> {
        trace!(class = object.class_name(), property = name, "isset");
        let conf = self.resolve(object.class())?;
        let property = lookup(&conf, name, "isset")?;

        if !property.gettable {
            return Err(violation(&conf, property, "isset", "reading is not enabled"));
        }

        if let Some(method) = property.override_for(AccessorOp::Isset) {
            return Ok(object.call_method(method, &[])?.is_truthy());
        }

        Ok(object.has_field(&property.name))
    }

    /// Write a property.
    ///
    /// Returns `Some` with the receiver to continue with when a `with`
    /// override returned an instance of the receiver's class. Every other
    /// write lands on `object` itself and returns `None`.
    pub fn set(
        &self,
        object: &mut Instance,
        kind: SetterKind,
        name: &str,
        value: Value,
    ) -> AccessorResult<Option<Instance>> {
        let op = kind.op();
        trace!(class = object.class_name(), property = name, operation = op.prefix(), "set");
        let conf = self.resolve(object.class())?;
        let property = lookup(&conf, name, op.prefix())?;

        if !property.settable {
            return Err(violation(&conf, property, op.prefix(), "writing is not enabled"));
        }

        if let Some(method) = property.override_for(op) {
            let result = object.call_method(method, &[value])?;
            if kind == SetterKind::With {
                if let Value::Object(next) = result {
                    if next.is_instance_of(object.class_name()) {
                        return Ok(Some(next));
                    }
                }
            }
            return Ok(None);
        }

        write(object, property, value)?;
        Ok(None)
    }

    /// Remove a property's value
    pub fn unset(&self, object: &mut Instance, name: &str) -> AccessorResult<()> {
        trace!(class = object.class_name(), property = name, "unset");
        let conf = self.resolve(object.class())?;
        let property = lookup(&conf, name, "unset")?;

        if property.immutable {
            return Err(AccessorError::ImmutableViolation {
                class: conf.class_name().to_string(),
                property: property.name.clone(),
            });
        }

        if !property.unsettable {
            return Err(violation(&conf, property, "unset", "unsetting is not enabled"));
        }

        if let Some(method) = property.override_for(AccessorOp::Unset) {
            object.call_method(method, &[])?;
            return Ok(());
        }

        object.unset_field(&property.name);
        Ok(())
    }
}

fn lookup<'c>(
    conf: &'c ClassConf,
    name: &str,
    operation: &'static str,
) -> AccessorResult<&'c PropertyDescriptor> {
    let property = conf
        .find(name)
        .ok_or_else(|| AccessorError::UnknownProperty {
            class: conf.class_name().to_string(),
            property: name.to_string(),
            operation,
        })?;

    if property.is_public() {
        return Err(violation(
            conf,
            property,
            operation,
            "property is public and accessed directly",
        ));
    }

    Ok(property)
}

fn violation(
    conf: &ClassConf,
    property: &PropertyDescriptor,
    operation: &'static str,
    hint: &str,
) -> AccessorError {
    AccessorError::PolicyViolation {
        class: conf.class_name().to_string(),
        property: property.name.clone(),
        operation,
        hint: hint.to_string(),
    }
}

fn write(object: &mut Instance, property: &PropertyDescriptor, value: Value) -> AccessorResult<()> {
    let value = match &property.mutator {
        Some(mutator) => mutator.invoke(object, value)?,
        None => value,
    };
    object.set_field(property.name.clone(), value);
    Ok(())
}

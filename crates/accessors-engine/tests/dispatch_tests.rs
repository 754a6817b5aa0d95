use std::sync::Arc;

use accessors_engine::*;

fn ucfirst(args: &[Value]) -> AccessorResult<Value> {
    let text = args.first().and_then(Value::as_str).unwrap_or_default();
    let mut chars = text.chars();
    let out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::Str(out))
}

fn engine() -> Accessors {
    let engine = Accessors::new();
    engine.register_function("ucfirst", ucfirst);
    engine
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_full_lifecycle_with_mutator() {
    let class = ClassDef::builder("A")
        .property(
            PropertyDef::protected("prop1")
                .attr(Attr::get())
                .attr(Attr::set_with_mutator("ucfirst"))
                .attr(Attr::delete()),
        )
        .build();
    let engine = engine();
    let mut a = Instance::new(&class);

    let next = engine
        .set(&mut a, SetterKind::Set, "prop1", Value::str("value1"))
        .unwrap();
    assert!(next.is_none());
    assert_eq!(a.field("prop1"), Value::str("Value1"));
    assert_eq!(engine.get(&mut a, "prop1").unwrap(), Value::str("Value1"));
    assert!(engine.isset(&mut a, "prop1").unwrap());

    engine.unset(&mut a, "prop1").unwrap();
    assert!(!engine.isset(&mut a, "prop1").unwrap());
    assert_eq!(engine.get(&mut a, "prop1").unwrap(), Value::Null);
}

#[test]
fn test_missing_get_policy_is_violation() {
    let class = ClassDef::builder("WriteOnly")
        .property(PropertyDef::protected("secret").attr(Attr::set()))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    engine
        .set(&mut obj, SetterKind::Set, "secret", Value::Int(7))
        .unwrap();

    let err = engine.get(&mut obj, "secret").unwrap_err();
    assert!(matches!(
        err,
        AccessorError::PolicyViolation { operation: "get", .. }
    ));
    assert!(engine.isset(&mut obj, "secret").unwrap_err().is_policy_violation());
    assert!(engine.unset(&mut obj, "secret").unwrap_err().is_policy_violation());
}

#[test]
fn test_unknown_property_for_every_operation() {
    let class = ClassDef::builder("Empty")
        .attr(Attr::get())
        .attr(Attr::set())
        .attr(Attr::delete())
        .property(PropertyDef::protected("known"))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    let errors = [
        engine.get(&mut obj, "nope").unwrap_err(),
        engine.isset(&mut obj, "nope").unwrap_err(),
        engine
            .set(&mut obj, SetterKind::Set, "nope", Value::Null)
            .unwrap_err(),
        engine.unset(&mut obj, "nope").unwrap_err(),
    ];

    for (err, operation) in errors.iter().zip(["get", "isset", "set", "unset"]) {
        assert_eq!(
            err,
            &AccessorError::UnknownProperty {
                class: "Empty".to_string(),
                property: "nope".to_string(),
                operation,
            }
        );
    }
}

#[test]
fn test_public_property_is_not_managed() {
    let class = ClassDef::builder("Open")
        .attr(Attr::get())
        .property(PropertyDef::public("visible").initial_value(1))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    let err = engine.get(&mut obj, "visible").unwrap_err();
    assert!(err.is_policy_violation());
    assert!(err.to_string().contains("public"));
}

// ============================================================================
// Case sensitivity
// ============================================================================

#[test]
fn test_case_insensitive_class() {
    let class = ClassDef::builder("Loose")
        .attr(Attr::get())
        .attr(Attr::ICase)
        .property(PropertyDef::protected("firstName").initial_value("Ann"))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    for name in ["firstName", "firstname", "FIRSTNAME", "FirstName"] {
        assert_eq!(engine.get(&mut obj, name).unwrap(), Value::str("Ann"));
    }
}

#[test]
fn test_case_sensitive_class() {
    let class = ClassDef::builder("Strict")
        .attr(Attr::get())
        .property(PropertyDef::protected("firstName").initial_value("Ann"))
        .property(
            PropertyDef::protected("lastName")
                .attr(Attr::ICase)
                .initial_value("Lee"),
        )
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    assert_eq!(engine.get(&mut obj, "firstName").unwrap(), Value::str("Ann"));
    assert!(engine.get(&mut obj, "firstname").unwrap_err().is_unknown_property());

    // property-level switch
    assert_eq!(engine.get(&mut obj, "LASTNAME").unwrap(), Value::str("Lee"));
}

// ============================================================================
// Immutability
// ============================================================================

#[test]
fn test_immutable_blocks_unset() {
    let class = ClassDef::builder("Frozen")
        .attr(Attr::get())
        .property(
            PropertyDef::protected("deletable")
                .attr(Attr::delete())
                .attr(Attr::Immutable)
                .initial_value(1),
        )
        .property(
            PropertyDef::protected("locked")
                .attr(Attr::delete().disabled())
                .attr(Attr::Immutable)
                .initial_value(2),
        )
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    for name in ["deletable", "locked"] {
        let err = engine.unset(&mut obj, name).unwrap_err();
        assert_eq!(
            err,
            AccessorError::ImmutableViolation {
                class: "Frozen".to_string(),
                property: name.to_string(),
            }
        );
    }
    assert!(obj.has_field("deletable"));
}

// ============================================================================
// Overrides
// ============================================================================

fn overridden(other: &Arc<ClassDef>) -> Arc<ClassDef> {
    let other = Arc::clone(other);
    ClassDef::builder("Overridden")
        .attr(Attr::get())
        .attr(Attr::set_with_mutator("ucfirst"))
        .attr(Attr::delete())
        .property(PropertyDef::protected("prop").initial_value("raw"))
        .property(PropertyDef::protected("log"))
        .property(PropertyDef::protected("foreign"))
        .method("getProp", |_, _| Ok(Value::str("override")))
        .method("issetProp", |_, _| Ok(Value::Int(0)))
        .method("setProp", |this, args| {
            this.set_field("prop", Value::str(args[0].to_string().to_uppercase()));
            Ok(Value::Null)
        })
        .method("unsetProp", |this, _| {
            this.set_field("log", "unset called");
            Ok(Value::Null)
        })
        .method("withProp", |this, args| {
            let mut copy = this.clone();
            copy.set_field("prop", args[0].clone());
            Ok(Value::Object(copy))
        })
        .method("withForeign", move |_, _| Ok(Value::Object(Instance::new(&other))))
        .build()
}

#[test]
fn test_overrides_take_precedence() {
    let other = ClassDef::builder("Other").build();
    let engine = engine();
    let mut obj = Instance::new(&overridden(&other));

    assert_eq!(obj.field("prop"), Value::str("raw"));
    assert_eq!(engine.get(&mut obj, "prop").unwrap(), Value::str("override"));
    assert!(!engine.isset(&mut obj, "prop").unwrap());

    // override wins over the mutator
    engine
        .set(&mut obj, SetterKind::Set, "prop", Value::str("abc"))
        .unwrap();
    assert_eq!(obj.field("prop"), Value::str("ABC"));

    engine.unset(&mut obj, "prop").unwrap();
    assert_eq!(obj.field("log"), Value::str("unset called"));
    assert_eq!(obj.field("prop"), Value::str("ABC"));
}

#[test]
fn test_with_override_replaces_receiver() {
    let other = ClassDef::builder("Other").build();
    let engine = engine();
    let mut obj = Instance::new(&overridden(&other));

    let next = engine
        .set(&mut obj, SetterKind::With, "prop", Value::str("new"))
        .unwrap()
        .unwrap();
    assert_eq!(next.field("prop"), Value::str("new"));
    assert_eq!(obj.field("prop"), Value::str("raw"));

    // a result of another class keeps the receiver
    let kept = engine
        .set(&mut obj, SetterKind::With, "foreign", Value::Int(1))
        .unwrap();
    assert!(kept.is_none());
}

#[test]
fn test_with_without_override_writes_receiver() {
    let other = ClassDef::builder("Other").build();
    let engine = engine();
    let mut obj = Instance::new(&overridden(&other));

    let next = engine
        .set(&mut obj, SetterKind::With, "log", Value::str("entry"))
        .unwrap();
    assert!(next.is_none());
    assert_eq!(obj.field("log"), Value::str("Entry"));
    assert_eq!(engine.get(&mut obj, "log").unwrap(), Value::str("Entry"));
}

#[test]
fn test_static_methods_are_not_overrides() {
    let class = ClassDef::builder("StaticOnly")
        .attr(Attr::get())
        .property(PropertyDef::protected("prop").initial_value("raw"))
        .static_method("getProp", |_| Ok(Value::str("static")))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    assert_eq!(engine.get(&mut obj, "prop").unwrap(), Value::str("raw"));
}

#[test]
fn test_override_failure_propagates() {
    let class = ClassDef::builder("Failing")
        .attr(Attr::get())
        .property(PropertyDef::protected("prop"))
        .method("getProp", |_, _| Err(AccessorError::method("backend unavailable")))
        .build();
    let engine = engine();
    let mut obj = Instance::new(&class);

    let err = engine.get(&mut obj, "prop").unwrap_err();
    assert_eq!(err, AccessorError::Method("backend unavailable".to_string()));
}

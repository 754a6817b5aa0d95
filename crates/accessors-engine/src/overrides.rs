//! Override method detection
//!
//! A non-static method named `get<Property>`, `set<Property>`,
//! `isset<Property>`, `unset<Property>` or `with<Property>` (any case)
//! takes over that operation for that property. Methods are collected
//! through the inheritance chain with the most-derived declaration of a
//! name winning, the same way method calls resolve.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::class::ClassDef;
use crate::config::DuplicateOverrides;
use crate::error::{AccessorError, AccessorResult};
use crate::index::AccessIndex;

static ACCESSOR_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(get|set|isset|unset|with)(.+)$").expect("valid regex"));

/// An operation an override method can take over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorOp {
    /// Read
    Get,
    /// Plain write
    Set,
    /// Existence check
    Isset,
    /// Removal
    Unset,
    /// Fluent write returning a (possibly new) receiver
    With,
}

impl AccessorOp {
    /// Method name prefix for this operation
    pub fn prefix(self) -> &'static str {
        match self {
            AccessorOp::Get => "get",
            AccessorOp::Set => "set",
            AccessorOp::Isset => "isset",
            AccessorOp::Unset => "unset",
            AccessorOp::With => "with",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "get" => Some(AccessorOp::Get),
            "set" => Some(AccessorOp::Set),
            "isset" => Some(AccessorOp::Isset),
            "unset" => Some(AccessorOp::Unset),
            "with" => Some(AccessorOp::With),
            _ => None,
        }
    }
}

impl fmt::Display for AccessorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Split an accessor-style method name into its operation and the
/// remaining property part (original case preserved).
///
/// Returns `None` when the name doesn't follow the convention or the
/// property part is empty.
pub fn split_accessor_name(method: &str) -> Option<(AccessorOp, &str)> {
    let lower = method.to_ascii_lowercase();
    let caps = ACCESSOR_NAME_RE.captures(&lower)?;
    let prefix = caps.get(1)?.as_str();
    let op = AccessorOp::from_prefix(prefix)?;
    Some((op, &method[prefix.len()..]))
}

/// Override methods detected for one property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMethods {
    methods: FxHashMap<AccessorOp, String>,
}

impl OverrideMethods {
    /// Method overriding `op`, if any
    pub fn get(&self, op: AccessorOp) -> Option<&str> {
        self.methods.get(&op).map(String::as_str)
    }

    /// Check if `op` is overridden
    pub fn has(&self, op: AccessorOp) -> bool {
        self.methods.contains_key(&op)
    }

    /// Check if nothing is overridden
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Record `method` for `op`, returning the method it displaced
    fn insert(&mut self, op: AccessorOp, method: String) -> Option<String> {
        self.methods.insert(op, method)
    }
}

/// Match the property part of a method name to a declared property.
///
/// Case-insensitive classes go through the index. Otherwise the part must
/// equal the declared name, or the declared name with its first character
/// upper-cased (`getName` for `name`).
fn match_property<'a>(
    rest: &str,
    properties: &'a [String],
    index: &'a AccessIndex,
    case_insensitive: bool,
) -> Option<&'a str> {
    if case_insensitive {
        return index.resolve(rest);
    }

    if let Some(exact) = properties.iter().find(|p| p.as_str() == rest) {
        return Some(exact);
    }

    properties
        .iter()
        .find(|p| upper_first(p) == rest)
        .map(String::as_str)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Detect override methods for every property of `class`.
///
/// Two methods of the same class whose names only differ by case and
/// follow the accessor convention claim the same operation; depending on
/// `duplicates` that either fails or keeps the later one.
pub fn detect_overrides(
    class: &ClassDef,
    properties: &[String],
    index: &AccessIndex,
    case_insensitive: bool,
    duplicates: DuplicateOverrides,
) -> AccessorResult<FxHashMap<String, OverrideMethods>> {
    // lower-cased method name -> declared name, most-derived class last
    let mut table: FxHashMap<String, String> = FxHashMap::default();
    // keep first-seen order so detection is deterministic
    let mut order: Vec<String> = Vec::new();

    for ancestor in class.chain() {
        let mut seen_here: FxHashMap<String, &str> = FxHashMap::default();

        for method in ancestor.own_methods() {
            if method.is_static() {
                continue;
            }
            let Some((op, rest)) = split_accessor_name(&method.name) else {
                continue;
            };

            let key = method.name.to_ascii_lowercase();
            if let Some(first) = seen_here.get(key.as_str()) {
                let property = match_property(rest, properties, index, case_insensitive)
                    .unwrap_or(rest)
                    .to_string();
                duplicate(
                    duplicates,
                    ancestor.name(),
                    &property,
                    op,
                    first,
                    &method.name,
                )?;
            }
            seen_here.insert(key.clone(), &method.name);

            if !table.contains_key(&key) {
                order.push(key.clone());
            }
            table.insert(key, method.name.clone());
        }
    }

    let mut result: FxHashMap<String, OverrideMethods> = FxHashMap::default();

    for key in order {
        let Some(name) = table.get(&key) else {
            continue;
        };
        let Some((op, rest)) = split_accessor_name(name) else {
            continue;
        };
        let Some(property) = match_property(rest, properties, index, case_insensitive) else {
            continue;
        };

        let entry = result.entry(property.to_string()).or_default();
        if let Some(previous) = entry.get(op).map(str::to_string) {
            duplicate(duplicates, class.name(), property, op, &previous, name)?;
        }
        entry.insert(op, name.clone());
    }

    Ok(result)
}

fn duplicate(
    duplicates: DuplicateOverrides,
    class: &str,
    property: &str,
    op: AccessorOp,
    first: &str,
    second: &str,
) -> AccessorResult<()> {
    match duplicates {
        DuplicateOverrides::Reject => Err(AccessorError::AmbiguousOverride {
            class: class.to_string(),
            property: property.to_string(),
            operation: op.prefix(),
            first: first.to_string(),
            second: second.to_string(),
        }),
        DuplicateOverrides::LastWins => {
            warn!(
                class = class,
                property = property,
                operation = op.prefix(),
                kept = second,
                dropped = first,
                "ambiguous override methods, keeping the last one"
            );
            Ok(())
        }
    }
}

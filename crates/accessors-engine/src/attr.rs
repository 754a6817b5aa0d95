//! Declaration attributes attached to classes and properties

/// An accessor attribute as written on a class or a property.
///
/// `None` for `enabled` means the attribute is present but says nothing,
/// which leaves the kind undeclared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    /// Allow (or forbid) reads
    Get(Option<bool>),
    /// Allow (or forbid) writes, optionally naming a mutator
    Set {
        /// Whether writes are allowed
        enabled: Option<bool>,
        /// Mutator reference; `""` declares "no mutator"
        mutator: Option<String>,
    },
    /// Allow (or forbid) unsets
    Delete(Option<bool>),
    /// Mutator reference on its own; `""` declares "no mutator"
    Mutator(String),
    /// Match property names case-insensitively
    ICase,
    /// Never allow unsets
    Immutable,
}

impl Attr {
    /// `Get` enabled
    pub fn get() -> Self {
        Attr::Get(Some(true))
    }

    /// `Set` enabled, no mutator
    pub fn set() -> Self {
        Attr::Set {
            enabled: Some(true),
            mutator: None,
        }
    }

    /// `Set` enabled with a mutator reference
    pub fn set_with_mutator(mutator: impl Into<String>) -> Self {
        Attr::Set {
            enabled: Some(true),
            mutator: Some(mutator.into()),
        }
    }

    /// `Delete` enabled
    pub fn delete() -> Self {
        Attr::Delete(Some(true))
    }

    /// Standalone mutator reference
    pub fn mutator(reference: impl Into<String>) -> Self {
        Attr::Mutator(reference.into())
    }

    /// Same attribute with its switch turned off
    pub fn disabled(self) -> Self {
        match self {
            Attr::Get(_) => Attr::Get(Some(false)),
            Attr::Set { mutator, .. } => Attr::Set {
                enabled: Some(false),
                mutator,
            },
            Attr::Delete(_) => Attr::Delete(Some(false)),
            other => other,
        }
    }
}

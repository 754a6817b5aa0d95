//! Accessor error types

use thiserror::Error;

/// Errors reported by policy resolution and accessor dispatch.
///
/// All of these are deterministic: they depend only on the resolved class
/// policy and the call arguments, so none of them is worth retrying.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessorError {
    /// Name not found among the declared properties
    #[error("tried to {operation} unknown property \"{class}::${property}\"")]
    UnknownProperty {
        /// Class the lookup ran against
        class: String,
        /// Property name as given by the caller
        property: String,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation disabled by the resolved policy
    #[error("tried to {operation} misconfigured property \"{class}::${property}\" ({hint})")]
    PolicyViolation {
        /// Class owning the property
        class: String,
        /// Canonical property name
        property: String,
        /// Operation that was attempted
        operation: &'static str,
        /// What is missing or wrong with the declaration
        hint: String,
    },

    /// Unset attempted on an immutable property
    #[error("immutable property \"{class}::${property}\" can't be unset")]
    ImmutableViolation {
        /// Class owning the property
        class: String,
        /// Canonical property name
        property: String,
    },

    /// Mutator reference could not be resolved when the class was resolved
    #[error("mutator callback \"{reference}\" for property \"{class}::${property}\" is not valid")]
    InvalidMutatorReference {
        /// Declaring class
        class: String,
        /// Property the mutator applies to
        property: String,
        /// Reference after placeholder substitution
        reference: String,
    },

    /// Mutator resolved but turned out not to be callable for this object
    #[error("mutator \"{reference}\" can't be called on an instance of {class}: {reason}")]
    MutatorNotCallable {
        /// Runtime class of the written object
        class: String,
        /// Reference after placeholder substitution
        reference: String,
        /// Why the call could not be made
        reason: String,
    },

    /// Two override methods claim the same operation on the same property
    #[error(
        "methods {first}() and {second}() of class {class} both override {operation} of property \"{property}\""
    )]
    AmbiguousOverride {
        /// Class declaring both methods
        class: String,
        /// Property both methods map to
        property: String,
        /// Operation both methods map to
        operation: &'static str,
        /// Method that was seen first
        first: String,
        /// Method that was seen second
        second: String,
    },

    /// Behavior mixin received a method name it can't map
    #[error("unknown method {class}::{method}()")]
    UnknownMethod {
        /// Receiver class
        class: String,
        /// Method name as called
        method: String,
    },

    /// Behavior mixin received the wrong number of arguments
    #[error("expecting exactly {expected} argument(s) to method {class}::{method}(), got {actual}")]
    ArgumentCount {
        /// Receiver class
        class: String,
        /// Method name as called
        method: String,
        /// Number of arguments the operation takes
        expected: usize,
        /// Number of arguments received
        actual: usize,
    },

    /// An override method, mutator, or free function reported a failure
    #[error("{0}")]
    Method(String),
}

impl AccessorError {
    /// Create an error for a failing method or function body
    pub fn method(message: impl Into<String>) -> Self {
        Self::Method(message.into())
    }

    /// Whether this error is an unknown-property failure
    pub fn is_unknown_property(&self) -> bool {
        matches!(self, Self::UnknownProperty { .. })
    }

    /// Whether this error is a policy violation
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }
}

/// Result type for accessor operations
pub type AccessorResult<T> = Result<T, AccessorError>;

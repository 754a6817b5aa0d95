//! Declaration source reading doc comment tags

use accessors_engine::{
    AccessorResult, AttributeSource, ClassDef, DeclarationSource, PolicySet, PropertyDef,
};
use tracing::warn;

use crate::parser::DocBlock;

/// Layers `@property` tags from the class doc comment under another
/// source's declarations.
///
/// A property's policy is the wrapped source's property policy merged over
/// the tag's policy, so explicit attributes still win. Class-level
/// policies come from the wrapped source unchanged.
#[derive(Debug, Clone, Default)]
pub struct DocBlockSource<S = AttributeSource> {
    inner: S,
}

impl DocBlockSource<AttributeSource> {
    /// Layer doc comment tags under attribute declarations
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: DeclarationSource> DocBlockSource<S> {
    /// Layer doc comment tags under `inner`
    pub fn wrap(inner: S) -> Self {
        Self { inner }
    }

    fn doc_policy(class: &ClassDef, property: &str) -> PolicySet {
        let Some(comment) = class.doc_comment() else {
            return PolicySet::new();
        };

        match DocBlock::parse(comment) {
            Ok(doc) => doc
                .property(property)
                .map(|tag| tag.kind.policy())
                .unwrap_or_default(),
            Err(err) => {
                warn!(class = class.name(), error = %err, "ignoring doc comment");
                PolicySet::new()
            }
        }
    }
}

impl<S: DeclarationSource> DeclarationSource for DocBlockSource<S> {
    fn class_policy(&self, class: &ClassDef) -> AccessorResult<PolicySet> {
        self.inner.class_policy(class)
    }

    fn property_policy(&self, class: &ClassDef, property: &PropertyDef) -> AccessorResult<PolicySet> {
        let declared = self.inner.property_policy(class, property)?;
        Ok(declared.merge_with_parent(&Self::doc_policy(class, &property.name)))
    }
}

//! Doc comment front-end for property accessors
//!
//! Lets a class grant access through `@property`, `@property-read` and
//! `@property-write` tags in its doc comment instead of attributes:
//!
//! ```rust,ignore
//! use accessors_docblock::DocBlockSource;
//! use accessors_engine::{Accessors, ClassDef, PropertyDef};
//!
//! let class = ClassDef::builder("User")
//!     .doc("/**\n * @property-read int $id\n * @property string $name\n */")
//!     .property(PropertyDef::protected("id"))
//!     .property(PropertyDef::protected("name"))
//!     .build();
//!
//! let engine = Accessors::new().with_source(DocBlockSource::new());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod lexer;
pub mod parser;
pub mod source;

pub use parser::{DocBlock, DocBlockError, PropertyTag, TagKind};
pub use source::DocBlockSource;

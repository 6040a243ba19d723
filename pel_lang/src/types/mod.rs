//! The value model: kinds, type descriptors, runtime values, conversions

pub mod convert;
pub mod kind;
pub mod lang_type;
pub mod values;

pub use convert::{convert, ConversionError};
pub use kind::TypeKind;
pub use lang_type::{descriptor, ConversionMode, LangType, LangTypeBuilder, TypeError};
pub use values::LValue;

pub mod builtin;
pub mod data;
pub mod rules;

pub use data::*;
pub use rules::{
    title_case, DocumentTypeDef, DocumentTypeSpec, FieldPattern, FieldPatternDef, PatternLibrary,
};

//! The strategy pipeline: Extractor → Validator → Generator.

pub mod extractor;
pub mod generator;
pub mod rules;
pub mod validator;

pub use extractor::ParameterExtractor;
pub use generator::generate;
pub use validator::validate;

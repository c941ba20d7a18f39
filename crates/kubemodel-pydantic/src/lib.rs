//! Pydantic v2 code generation from the Kubernetes model IR.

pub mod emitters;
pub mod generator;
pub mod layout;
pub mod literal;
pub mod names;
pub mod ordering;
pub mod type_mapper;

pub use generator::PydanticGenerator;

pub mod schemas;
pub mod types;

pub use schemas::*;
pub use types::{IrModelSet, IrModule, NormalizedName, SchemaRef};

pub mod metadata;
pub mod transaction;

pub use metadata::*;
pub use transaction::*;

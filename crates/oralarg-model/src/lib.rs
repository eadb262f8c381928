pub mod case;
pub mod filename;
pub mod manifest;
pub mod year;

pub use case::*;
pub use filename::*;
pub use manifest::*;
pub use year::*;

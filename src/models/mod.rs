pub mod enums;
pub mod medicine;
pub mod prescription;

pub use enums::*;
pub use medicine::*;
pub use prescription::*;

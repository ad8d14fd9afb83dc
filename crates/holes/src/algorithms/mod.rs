pub mod binarization;
pub mod components;
pub mod euler;

pub use binarization::*;
pub use components::*;
pub use euler::*;

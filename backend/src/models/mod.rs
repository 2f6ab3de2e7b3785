pub mod contract;
pub mod product;
pub mod week;

pub use contract::*;
pub use product::*;
pub use week::*;

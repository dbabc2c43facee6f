pub mod driver;
pub mod judge;
pub mod result;
pub mod runner;

pub use judge::*;
pub use result::*;
pub use runner::*;

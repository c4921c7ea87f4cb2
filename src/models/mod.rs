pub mod portfolio;
pub mod quote;
pub mod response;

pub use portfolio::*;
pub use quote::*;
pub use response::*;

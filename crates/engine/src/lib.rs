pub mod calc;
pub mod item;
pub mod pricing;
pub mod quote;

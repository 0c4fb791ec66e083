pub mod pricebook;

pub use pricebook::PriceBook;

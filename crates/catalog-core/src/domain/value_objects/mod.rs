mod price;

pub use price::*;

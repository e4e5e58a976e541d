pub mod geo;
pub mod let_also;
pub mod serde;

pub mod entry;
pub mod interface;
pub mod range;

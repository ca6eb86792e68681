pub mod read;
pub mod store;
pub mod write;
pub mod parse;

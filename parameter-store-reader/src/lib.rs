pub mod cli;
pub mod configs;
pub mod domain;
pub mod error;
pub mod format;
pub mod reader;
pub mod session;
pub mod store;
pub mod tree;

pub use error::ReaderError;

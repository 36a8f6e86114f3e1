pub mod adapters;
pub mod client;
pub mod repository;

pub use client::ParameterStore;
pub use repository::{ParameterSource, PathQuery};

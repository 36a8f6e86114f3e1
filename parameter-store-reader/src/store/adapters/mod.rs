pub mod local_store;
pub mod ssm_store;

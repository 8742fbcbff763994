//! Shared application domain and persistence modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod request_context;

#[cfg(test)]
mod test;

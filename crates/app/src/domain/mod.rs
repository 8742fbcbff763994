//! Cart API Domain Concerns

pub mod carts;

//! Carts

mod errors;
mod handlers;
pub(crate) mod items;
mod params;
pub(crate) mod responses;

pub(crate) use handlers::*;

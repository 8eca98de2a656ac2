//! Cart

mod errors;
pub(crate) mod handlers;
pub(crate) mod lines;
mod models;

pub(crate) use handlers::*;

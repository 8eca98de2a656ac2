//! Cart Lines

pub(crate) mod handlers;

pub(crate) use handlers::*;

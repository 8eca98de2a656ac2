//! Checkout transaction core: carts, pricing snapshots, order numbering and checkout.

pub mod context;
pub mod database;
pub mod domain;
pub mod money;

#[cfg(test)]
mod test;

mod uuids;

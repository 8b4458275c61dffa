// server/src/db/mod.rs

pub mod product_store;

pub use product_store::PgProductStore;

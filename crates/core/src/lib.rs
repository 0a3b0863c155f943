pub mod catalog;
pub mod config;

pub use catalog::{Catalog, Product};
pub use config::Config;

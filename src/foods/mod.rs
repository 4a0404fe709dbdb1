pub mod repo;

pub use repo::{Food, PoolFilter};

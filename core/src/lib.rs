pub mod action;
pub mod catalog;
pub mod config;
pub mod literal;
pub mod model;
pub mod store;
pub mod str_interp;
pub mod style;
pub mod testing;

pub use crate::config::Config;

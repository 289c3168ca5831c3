//! CLI command implementations.

mod common;

pub mod export;
pub mod proxy;
pub mod recommend;
pub mod signals;
pub mod validate;
pub mod watch;

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use proxylink_core as core;
pub use proxylink_docker_api as docker;
pub use proxylink_docker_index as index;

mod args;
mod log;
mod output;

pub use self::{args::Args, log::LogFormat, output::Output};

#![forbid(unsafe_code)]

mod args;
mod config;
mod jsonrpc;
mod logging;

pub(crate) use args::*;
pub(crate) use config::*;
pub(crate) use jsonrpc::*;
pub(crate) use logging::*;

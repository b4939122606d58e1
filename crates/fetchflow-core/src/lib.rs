pub mod config;
pub mod logging;

pub mod api;
pub mod demo;
pub mod flow;
pub mod pipeline;
pub mod retry;

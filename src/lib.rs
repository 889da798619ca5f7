pub mod api;
pub mod commands;
pub mod credential;
pub mod http;
pub mod normalize;
pub mod runtime;

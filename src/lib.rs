pub mod api;
pub mod config;
pub mod dispatch;
pub mod notify;
pub mod observability;
pub mod producer;
pub mod queue;
pub mod routing;
pub mod server;

pub mod client;
pub mod http;
pub mod query_builder;

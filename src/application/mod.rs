pub mod fetch;
pub mod gate;
pub mod query;

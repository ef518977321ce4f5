pub mod cancel;
pub mod error;
pub mod filter;
pub mod model;
pub mod traits;

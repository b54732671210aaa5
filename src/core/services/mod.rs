pub mod endpoints;
pub mod http;

pub use endpoints::*;
pub use http::*;

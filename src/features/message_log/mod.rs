pub mod components;
pub mod services;

pub use components::*;
pub use services::*;

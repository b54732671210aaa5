pub mod hooks;
pub mod identity;
pub mod models;
pub mod services;
pub mod sync;

pub mod run_view;
pub mod runs;

pub use run_view::RunView;
pub use runs::Runs;

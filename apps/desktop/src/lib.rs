pub mod engine_backend;
pub mod ui;

pub use engine_backend::EngineBackend;
pub use ui::run_app;

use glide_desktop::EngineBackend;
use tracing_subscriber::EnvFilter;

#[macroquad::main("Glide - Swipe Typing Demo")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backend = EngineBackend::new();
    glide_desktop::run_app(backend).await;
}

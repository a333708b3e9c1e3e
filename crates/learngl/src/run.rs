use anyhow::Result;
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;
use crate::settings;

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let config = settings::load(&args, &paths)?;
    tracing::debug!(
        config_dir = %paths.config_dir().display(),
        shader_roots = ?paths.shader_roots(),
        "resolved learngl paths"
    );
    tracing::info!(
        variant = %config.variant,
        backend = %config.backend,
        width = config.window.size.0,
        height = config.window.size.1,
        "starting renderer"
    );

    let renderer = Renderer::new(config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

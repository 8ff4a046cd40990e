mod app;
mod command;
mod logging;
mod navigation;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::Context;

/// Entry point: `newsdesk [SETTINGS_FILE]`.
pub fn run() -> anyhow::Result<()> {
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(settings::SETTINGS_FILENAME));
    let (shell_settings, warning) = settings::load(&settings_path);

    logging::initialize(shell_settings.log_destination, shell_settings.verbose);
    settings::report(&settings_path, &shell_settings, warning);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(app::run(shell_settings))
}

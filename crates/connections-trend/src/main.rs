mod bootstrap;
mod pipeline;

use anyhow::Result;
use chrono::Utc;
use trend_core::settings::Settings;
use trend_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("connections-trend v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {:?}, Days: {}, Timezone: {}, Theme: {}",
        settings.view,
        settings.days,
        settings.timezone,
        settings.theme
    );

    let mut app = App::new(&settings.theme);
    pipeline::run(&settings, Utc::now(), &mut app)?;

    Ok(())
}

use std::net::TcpListener;

use anyhow::Context;

use contact_api::settings::Settings;
use contact_api::{app, backend, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    let subscriber = telemetry::create_subscriber(settings.app.log_filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let backend = backend::build(&settings)?;

    let listener = TcpListener::bind(settings.app.addr()).context("Failed to bind listener")?;
    tracing::info!(addr = ?listener.local_addr()?, "Listening for contact submissions");

    app::run(listener, backend)?.await.context("Failed to run app")
}

use clap::Parser;
use color_eyre::eyre::Report;
use social_api::Settings;
use social_api::layers::Telemetry;

#[tokio::main]
async fn main() -> Result<(), Report> {
    let settings = Settings::parse();
    Telemetry::new(&settings).setup()?;
    social_api::run(settings).await
}

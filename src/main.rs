use anyhow::Context;
use clap::Parser;
use flight_booking_facade::{
    AppConfig, BookingFacade, ConsoleSession, LoggerListener, Messages, SessionOutcome,
    SharedWriter, TripInput, UserListener,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "flight-booking", about = "Search, book and refund flights through one facade")]
struct Cli {
    #[arg(long, help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Prompt language: en or ru")]
    locale: Option<String>,

    #[arg(long, help = "Departure city (prompted when absent)")]
    from: Option<String>,

    #[arg(long, help = "Destination city (prompted when absent)")]
    to: Option<String>,

    #[arg(long, help = "Airline code (prompted when absent)")]
    airline: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(locale) = &cli.locale {
        config.locale = locale.parse()?;
    }

    // Logs go to stderr so they never interleave with the console transcript
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = SharedWriter::stdout();
    let messages = Messages::for_locale(config.locale);

    let facade = BookingFacade::with_default_airlines()
        .with_flight_numbers(config.flight_numbers())
        .context("Invalid flight number range")?;
    let user = Arc::new(UserListener::new(output.clone()).with_prefix(messages.user_prefix));
    let logger = Arc::new(LoggerListener::new(output.clone()).with_prefix(messages.log_prefix));
    facade.register_listener(user);
    facade.register_listener(logger);

    let preset = TripInput {
        from_city: cli.from,
        to_city: cli.to,
        airline: cli.airline,
    };

    let stdin = std::io::stdin();
    let mut session = ConsoleSession::new(stdin.lock(), output, messages);
    let outcome = session
        .run(&facade, preset)
        .await
        .context("Console session failed")?;

    match &outcome {
        SessionOutcome::Refunded(ticket) => tracing::info!(%ticket, "session finished with refund"),
        other => tracing::debug!(outcome = ?other, "session finished"),
    }

    Ok(())
}

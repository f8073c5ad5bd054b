// Listeners react to booking and refund events broadcast by the facade

use crate::output::SharedWriter;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Listener rejected message: {0}")]
    Rejected(String),
}

// Observer side of the facade.
//
// Implementations receive every summary message in registration order.
// Returning an error only marks this delivery as failed; the facade keeps
// notifying the remaining listeners.
pub trait BookingListener: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn on_notify(&self, message: &str) -> Result<(), NotifyError>;
}

// Renders a user-facing notification line
pub struct UserListener {
    out: SharedWriter,
    prefix: String,
}

impl UserListener {
    pub fn new(out: SharedWriter) -> Self {
        Self {
            out,
            prefix: "Notification for user: ".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl BookingListener for UserListener {
    fn name(&self) -> &str {
        "user"
    }

    fn on_notify(&self, message: &str) -> Result<(), NotifyError> {
        self.out.write_line(&format!("{}{}", self.prefix, message))?;
        Ok(())
    }
}

// Writes a log-style line and records the event through tracing
pub struct LoggerListener {
    out: SharedWriter,
    prefix: String,
}

impl LoggerListener {
    pub fn new(out: SharedWriter) -> Self {
        Self {
            out,
            prefix: "Log: ".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl BookingListener for LoggerListener {
    fn name(&self) -> &str {
        "logger"
    }

    fn on_notify(&self, message: &str) -> Result<(), NotifyError> {
        info!(event = %message, "booking event");
        self.out.write_line(&format!("{}{}", self.prefix, message))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_user_and_logger_lines() {
        let out = SharedWriter::buffer();
        let user = UserListener::new(out.clone());
        let logger = LoggerListener::new(out.clone());

        user.on_notify("Booking completed").unwrap();
        logger.on_notify("Booking completed").unwrap();

        assert_eq!(
            out.contents(),
            "Notification for user: Booking completed\nLog: Booking completed\n"
        );
    }

    #[test]
    fn test_custom_prefix() {
        let out = SharedWriter::buffer();
        let user = UserListener::new(out.clone()).with_prefix("Уведомление пользователю: ");

        user.on_notify("ok").unwrap();

        assert_eq!(out.contents(), "Уведомление пользователю: ok\n");
        assert_eq!(user.name(), "user");
    }

    #[test]
    fn test_logger_event_passes_default_filter() {
        let captured = SharedWriter::buffer();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&AppConfig::default().log_filter))
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let logger = LoggerListener::new(SharedWriter::buffer());
        tracing::subscriber::with_default(subscriber, || {
            logger.on_notify("Booking completed on Airline A for flight A123").unwrap();
        });

        let logs = captured.contents();
        assert!(logs.contains("booking event"), "nothing captured: {:?}", logs);
        assert!(logs.contains("Booking completed on Airline A for flight A123"));
    }
}

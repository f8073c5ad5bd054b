// Flight booking facade: airlines behind one coordinator, listeners notified of every booking and refund

pub mod airline;
pub mod config;
pub mod console;
pub mod facade;
pub mod listener;
pub mod output;
pub mod registry;

// Re-export key types for convenience
pub use airline::{Airline, AirlineA, AirlineB, AirlineCode, AirlineError};
pub use config::{AppConfig, ConfigError, Locale};
pub use console::{ConsoleSession, Messages, SessionOutcome, TripInput};
pub use facade::{
    BookingError, BookingFacade, BookingOutcome, BookingRequest, RefundDecision, RefundOutcome,
    Ticket, TicketId,
};
pub use listener::{BookingListener, LoggerListener, NotifyError, UserListener};
pub use output::SharedWriter;
pub use registry::{ListenerFailure, ListenerRegistry, NotifyReport};

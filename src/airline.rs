// Airline providers: interchangeable backends behind the booking facade
// Every provider answers search, book and refund with descriptive text

use async_trait::async_trait;
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

// Errors a provider may report. The built-in airlines never fail, but a
// network-backed provider would surface its failures through these.
#[derive(Error, Debug)]
pub enum AirlineError {
    #[error("Airline unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected by airline: {0}")]
    Rejected(String),
}

// Key identifying a provider. Case-sensitive, so "a" does not select "A".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirlineCode(String);

impl AirlineCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirlineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AirlineCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Borrow<str> for AirlineCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Provider contract. Implementations must be stateless with respect to
// bookings: the facade owns tickets, providers only describe the operation.
#[async_trait]
pub trait Airline: Send + Sync + 'static {
    // Human-readable name embedded in every response, e.g. "Airline A"
    fn label(&self) -> &str;

    // Search flights between two cities
    async fn search(&self, from_city: &str, to_city: &str) -> Result<String, AirlineError>;

    // Book a seat on the given flight
    async fn book(&self, flight_id: &str) -> Result<String, AirlineError>;

    // Refund a previously issued ticket
    async fn refund(&self, ticket_id: &str) -> Result<String, AirlineError>;
}

fn search_text(label: &str, from_city: &str, to_city: &str) -> String {
    format!("Searching flights on {} from {} to {}", label, from_city, to_city)
}

fn booking_text(label: &str, flight_id: &str) -> String {
    format!("Booking ticket for flight {} on {}", flight_id, label)
}

fn refund_text(label: &str, ticket_id: &str) -> String {
    format!("Refunding ticket number {} on {}", ticket_id, label)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AirlineA;

#[async_trait]
impl Airline for AirlineA {
    fn label(&self) -> &str {
        "Airline A"
    }

    async fn search(&self, from_city: &str, to_city: &str) -> Result<String, AirlineError> {
        Ok(search_text(self.label(), from_city, to_city))
    }

    async fn book(&self, flight_id: &str) -> Result<String, AirlineError> {
        Ok(booking_text(self.label(), flight_id))
    }

    async fn refund(&self, ticket_id: &str) -> Result<String, AirlineError> {
        Ok(refund_text(self.label(), ticket_id))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AirlineB;

#[async_trait]
impl Airline for AirlineB {
    fn label(&self) -> &str {
        "Airline B"
    }

    async fn search(&self, from_city: &str, to_city: &str) -> Result<String, AirlineError> {
        Ok(search_text(self.label(), from_city, to_city))
    }

    async fn book(&self, flight_id: &str) -> Result<String, AirlineError> {
        Ok(booking_text(self.label(), flight_id))
    }

    async fn refund(&self, ticket_id: &str) -> Result<String, AirlineError> {
        Ok(refund_text(self.label(), ticket_id))
    }
}

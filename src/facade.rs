// Booking facade: the single entry point over every registered airline
// It dispatches by airline code, keeps a ledger of issued tickets and
// broadcasts a summary of each successful booking or refund to its listeners

use crate::airline::{Airline, AirlineA, AirlineB, AirlineCode, AirlineError};
use crate::listener::BookingListener;
use crate::registry::{ListenerRegistry, NotifyReport};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use rand::Rng;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid airline selection: {0}")]
    InvalidAirlineSelection(String),

    #[error("Invalid confirmation input: {0}")]
    InvalidConfirmation(String),

    #[error("Unknown ticket: {0}")]
    UnknownTicket(String),

    #[error("Airline {code} failed: {source}")]
    Airline {
        code: AirlineCode,
        #[source]
        source: AirlineError,
    },

    #[error("Airline already registered: {0}")]
    DuplicateAirline(AirlineCode),

    #[error("Empty flight number range: {start}..={end}")]
    InvalidFlightRange { start: u16, end: u16 },
}

// Correlation id tying a booking to its later refund
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    fn random() -> Self {
        Self(format!("TKT-{:08X}", rand::random::<u32>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TicketId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub airline: AirlineCode,
    pub flight_id: String,
    pub from_city: String,
    pub to_city: String,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub from_city: String,
    pub to_city: String,
    // Raw selector as typed by the caller, resolved against registered codes
    pub airline: String,
    // Flight to book; generated from the airline code when absent
    pub flight_id: Option<String>,
}

impl BookingRequest {
    pub fn new(
        from_city: impl Into<String>,
        to_city: impl Into<String>,
        airline: impl Into<String>,
    ) -> Self {
        Self {
            from_city: from_city.into(),
            to_city: to_city.into(),
            airline: airline.into(),
            flight_id: None,
        }
    }

    pub fn with_flight(mut self, flight_id: impl Into<String>) -> Self {
        self.flight_id = Some(flight_id.into());
        self
    }
}

#[derive(Debug)]
pub struct BookingOutcome {
    pub ticket: Ticket,
    pub search_info: String,
    pub booking_info: String,
    pub summary: String,
    pub notifications: NotifyReport,
}

// Decision gathered by the caller before a refund is attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundDecision {
    Confirm,
    Decline,
}

impl FromStr for RefundDecision {
    type Err = BookingError;

    // Accepts the English and Russian answers the console offers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" | "yes" | "Да" | "да" => Ok(RefundDecision::Confirm),
            "No" | "no" | "Нет" | "нет" => Ok(RefundDecision::Decline),
            other => Err(BookingError::InvalidConfirmation(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum RefundOutcome {
    Refunded {
        ticket: Ticket,
        message: String,
        notifications: NotifyReport,
    },
    Declined,
}

pub struct BookingFacade {
    airlines: HashMap<AirlineCode, Arc<dyn Airline>>,
    listeners: ListenerRegistry,
    tickets: DashMap<TicketId, Ticket>,
    flight_numbers: RangeInclusive<u16>,
}

impl Default for BookingFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingFacade {
    // Facade with no airlines; add them with `register_airline`
    pub fn new() -> Self {
        Self {
            airlines: HashMap::new(),
            listeners: ListenerRegistry::new(),
            tickets: DashMap::new(),
            flight_numbers: 100..=999,
        }
    }

    // Airline A under "A" and Airline B under "B"
    pub fn with_default_airlines() -> Self {
        let mut facade = Self::new();
        facade
            .airlines
            .insert(AirlineCode::from("A"), Arc::new(AirlineA));
        facade
            .airlines
            .insert(AirlineCode::from("B"), Arc::new(AirlineB));
        facade
    }

    // Range generated flight numbers are drawn from; must not be empty
    pub fn with_flight_numbers(mut self, range: RangeInclusive<u16>) -> Result<Self, BookingError> {
        if range.is_empty() {
            return Err(BookingError::InvalidFlightRange {
                start: *range.start(),
                end: *range.end(),
            });
        }
        self.flight_numbers = range;
        Ok(self)
    }

    // One provider instance per code for the facade's lifetime
    pub fn register_airline(
        &mut self,
        code: impl Into<AirlineCode>,
        airline: Arc<dyn Airline>,
    ) -> Result<(), BookingError> {
        let code = code.into();
        if self.airlines.contains_key(&code) {
            return Err(BookingError::DuplicateAirline(code));
        }
        info!(%code, label = airline.label(), "registered airline");
        self.airlines.insert(code, airline);
        Ok(())
    }

    // Registered codes in sorted order
    pub fn airline_codes(&self) -> Vec<AirlineCode> {
        let mut codes: Vec<AirlineCode> = self.airlines.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn register_listener(&self, listener: Arc<dyn BookingListener>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener<L: BookingListener + ?Sized>(&self, listener: &Arc<L>) -> usize {
        self.listeners.unregister(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify_all(&self, message: &str) -> NotifyReport {
        self.listeners.notify_all(message)
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.tickets.get(ticket_id).map(|entry| entry.value().clone())
    }

    pub fn open_ticket_count(&self) -> usize {
        self.tickets.len()
    }

    fn resolve(&self, selector: &str) -> Result<(AirlineCode, Arc<dyn Airline>), BookingError> {
        match self.airlines.get_key_value(selector) {
            Some((code, airline)) => Ok((code.clone(), Arc::clone(airline))),
            None => {
                warn!(selector, "no airline registered for selector");
                Err(BookingError::InvalidAirlineSelection(selector.to_string()))
            }
        }
    }

    fn next_flight_id(&self, code: &AirlineCode) -> String {
        let number = rand::thread_rng().gen_range(self.flight_numbers.clone());
        format!("{}{}", code, number)
    }

    // Stores the ticket under a fresh id; retries on the unlikely id collision
    fn issue_ticket(&self, code: AirlineCode, flight_id: String, request: &BookingRequest) -> Ticket {
        loop {
            let id = TicketId::random();
            if let Entry::Vacant(slot) = self.tickets.entry(id.clone()) {
                let ticket = Ticket {
                    id,
                    airline: code,
                    flight_id,
                    from_city: request.from_city.clone(),
                    to_city: request.to_city.clone(),
                    booked_at: Utc::now(),
                };
                slot.insert(ticket.clone());
                return ticket;
            }
        }
    }

    pub async fn search_and_book(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingOutcome, BookingError> {
        self.search_and_book_with(request, |_| {}).await
    }

    // Searches, books and notifies in one transaction.
    //
    // `on_step` receives the search text and then the booking text as soon
    // as each provider call returns, before listeners are notified, so a
    // caller can render them in call order.
    //
    // An unknown selector fails before any provider call. A provider failure
    // stops the transaction: no ticket is recorded and nobody is notified.
    pub async fn search_and_book_with<F>(
        &self,
        request: &BookingRequest,
        mut on_step: F,
    ) -> Result<BookingOutcome, BookingError>
    where
        F: FnMut(&str),
    {
        let (code, airline) = self.resolve(&request.airline)?;
        let airline_error = |source| BookingError::Airline {
            code: code.clone(),
            source,
        };

        let search_info = airline
            .search(&request.from_city, &request.to_city)
            .await
            .map_err(airline_error)?;
        on_step(&search_info);

        let flight_id = match &request.flight_id {
            Some(flight_id) => flight_id.clone(),
            None => self.next_flight_id(&code),
        };
        let booking_info = airline.book(&flight_id).await.map_err(airline_error)?;
        on_step(&booking_info);

        let summary = format!(
            "Booking completed on {} for flight {}",
            airline.label(),
            flight_id
        );
        let ticket = self.issue_ticket(code, flight_id, request);
        info!(
            ticket = %ticket.id,
            airline = %ticket.airline,
            flight = %ticket.flight_id,
            booked_at = %ticket.booked_at.to_rfc3339(),
            "ticket booked"
        );

        let notifications = self.notify_all(&summary);
        Ok(BookingOutcome {
            ticket,
            search_info,
            booking_info,
            summary,
            notifications,
        })
    }

    pub async fn refund_ticket(
        &self,
        ticket_id: &str,
        decision: RefundDecision,
    ) -> Result<RefundOutcome, BookingError> {
        self.refund_ticket_with(ticket_id, decision, |_| {}).await
    }

    // Refunds a ticket issued by this facade once the caller has confirmed.
    // A declined refund touches nothing. On provider failure the ticket stays open.
    pub async fn refund_ticket_with<F>(
        &self,
        ticket_id: &str,
        decision: RefundDecision,
        mut on_step: F,
    ) -> Result<RefundOutcome, BookingError>
    where
        F: FnMut(&str),
    {
        if decision == RefundDecision::Decline {
            debug!(ticket = ticket_id, "refund declined");
            return Ok(RefundOutcome::Declined);
        }

        // Taking the ticket out first keeps two concurrent refunds from both succeeding
        let (_, ticket) = self
            .tickets
            .remove(ticket_id)
            .ok_or_else(|| BookingError::UnknownTicket(ticket_id.to_string()))?;

        let airline = match self.airlines.get(&ticket.airline) {
            Some(airline) => Arc::clone(airline),
            None => {
                let code = ticket.airline.to_string();
                self.tickets.insert(ticket.id.clone(), ticket);
                return Err(BookingError::InvalidAirlineSelection(code));
            }
        };

        let message = match airline.refund(ticket.id.as_str()).await {
            Ok(message) => message,
            Err(source) => {
                let code = ticket.airline.clone();
                self.tickets.insert(ticket.id.clone(), ticket);
                return Err(BookingError::Airline { code, source });
            }
        };
        on_step(&message);
        info!(ticket = %ticket.id, airline = %ticket.airline, "ticket refunded");

        let notifications = self.notify_all(&message);
        Ok(RefundOutcome::Refunded {
            ticket,
            message,
            notifications,
        })
    }

    // Queries every registered airline concurrently. Results are ordered by
    // airline code; nothing is booked and no listener is notified.
    pub async fn search_all(
        &self,
        from_city: &str,
        to_city: &str,
    ) -> Vec<(AirlineCode, Result<String, AirlineError>)> {
        let searches = self.airline_codes().into_iter().map(|code| {
            let airline = Arc::clone(&self.airlines[&code]);
            async move {
                let result = airline.search(from_city, to_city).await;
                (code, result)
            }
        });
        join_all(searches).await
    }
}

// Console front end: gathers trip details and the refund confirmation,
// drives the facade and renders its results line by line

use crate::airline::AirlineCode;
use crate::config::Locale;
use crate::facade::{BookingError, BookingFacade, BookingRequest, RefundDecision, TicketId};
use crate::output::SharedWriter;
use std::io::{self, BufRead, Write};
use tracing::debug;

// User-facing text for one locale
#[derive(Debug, Clone)]
pub struct Messages {
    pub from_prompt: &'static str,
    pub to_prompt: &'static str,
    pub airline_prompt: &'static str,
    pub airline_separator: &'static str,
    pub refund_prompt: &'static str,
    pub refunding: &'static str,
    pub decline: &'static str,
    pub invalid_confirmation: &'static str,
    pub invalid_airline: &'static str,
    pub user_prefix: &'static str,
    pub log_prefix: &'static str,
}

impl Messages {
    pub fn english() -> Self {
        Self {
            from_prompt: "Enter departure city: ",
            to_prompt: "Enter destination city: ",
            airline_prompt: "Choose an airline",
            airline_separator: " or ",
            refund_prompt: "Do you want to refund the ticket? (Yes/No): ",
            refunding: "Refunding ticket...",
            decline: "Have a nice flight!",
            invalid_confirmation: "Invalid input. Please enter 'Yes' or 'No'.",
            invalid_airline: "Invalid airline selection",
            user_prefix: "Notification for user: ",
            log_prefix: "Log: ",
        }
    }

    pub fn russian() -> Self {
        Self {
            from_prompt: "Введите город отправления: ",
            to_prompt: "Введите город назначения: ",
            airline_prompt: "Выберите авиакомпанию",
            airline_separator: " или ",
            refund_prompt: "Вы хотите вернуть билет? (Да/Нет): ",
            refunding: "Возврат билета...",
            decline: "Хорошего полёта!",
            invalid_confirmation: "Неверный ввод. Пожалуйста, введите 'Да' или 'Нет'.",
            invalid_airline: "Неверный выбор авиакомпании",
            user_prefix: "Уведомление пользователю: ",
            log_prefix: "Логирование: ",
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::english(),
            Locale::Ru => Self::russian(),
        }
    }

    // e.g. "Choose an airline (A or B): "
    pub fn airline_choice(&self, codes: &[AirlineCode]) -> String {
        let choices: Vec<&str> = codes.iter().map(AirlineCode::as_str).collect();
        format!(
            "{} ({}): ",
            self.airline_prompt,
            choices.join(self.airline_separator)
        )
    }
}

// Values already known from the command line; missing ones are prompted for
#[derive(Debug, Clone, Default)]
pub struct TripInput {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub airline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    InvalidSelection(String),
    BookingFailed(String),
    Refunded(TicketId),
    Declined(TicketId),
    InvalidConfirmation(TicketId),
    RefundFailed(TicketId),
}

// Collects provider lines during a facade call, keeping the first write error
struct StepLines {
    output: SharedWriter,
    error: Option<io::Error>,
}

impl StepLines {
    fn new(output: &SharedWriter) -> Self {
        Self {
            output: output.clone(),
            error: None,
        }
    }

    fn push(&mut self, line: &str) {
        if let Err(err) = self.output.write_line(line) {
            self.error.get_or_insert(err);
        }
    }

    fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub struct ConsoleSession<R> {
    input: R,
    output: SharedWriter,
    messages: Messages,
}

impl<R: BufRead> ConsoleSession<R> {
    pub fn new(input: R, output: SharedWriter, messages: Messages) -> Self {
        Self {
            input,
            output,
            messages,
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn value_or_prompt(&mut self, preset: Option<String>, text: &str) -> io::Result<String> {
        match preset {
            Some(value) => Ok(value),
            None => self.prompt(text),
        }
    }

    // Runs one booking followed by the refund question.
    //
    // Domain failures (unknown airline, invalid confirmation, provider
    // errors) are rendered and reported through the returned outcome; only
    // terminal I/O failures produce an `Err`.
    pub async fn run(
        &mut self,
        facade: &BookingFacade,
        preset: TripInput,
    ) -> io::Result<SessionOutcome> {
        let from_city = self.value_or_prompt(preset.from_city, self.messages.from_prompt)?;
        let to_city = self.value_or_prompt(preset.to_city, self.messages.to_prompt)?;
        let airline_prompt = self.messages.airline_choice(&facade.airline_codes());
        let airline = self.value_or_prompt(preset.airline, &airline_prompt)?;
        debug!(%from_city, %to_city, %airline, "trip input collected");

        let request = BookingRequest::new(from_city, to_city, airline);
        let mut lines = StepLines::new(&self.output);
        let booked = facade
            .search_and_book_with(&request, |line| lines.push(line))
            .await;
        lines.finish()?;

        let ticket = match booked {
            Ok(outcome) => outcome.ticket,
            Err(BookingError::InvalidAirlineSelection(selector)) => {
                self.output.write_line(self.messages.invalid_airline)?;
                return Ok(SessionOutcome::InvalidSelection(selector));
            }
            Err(err) => {
                self.output.write_line(&err.to_string())?;
                return Ok(SessionOutcome::BookingFailed(err.to_string()));
            }
        };

        let answer = self.prompt(self.messages.refund_prompt)?;
        match answer.parse::<RefundDecision>() {
            Err(_) => {
                self.output.write_line(self.messages.invalid_confirmation)?;
                Ok(SessionOutcome::InvalidConfirmation(ticket.id))
            }
            Ok(RefundDecision::Decline) => {
                self.output.write_line(self.messages.decline)?;
                Ok(SessionOutcome::Declined(ticket.id))
            }
            Ok(RefundDecision::Confirm) => {
                self.output.write_line(self.messages.refunding)?;
                let mut lines = StepLines::new(&self.output);
                let refunded = facade
                    .refund_ticket_with(ticket.id.as_str(), RefundDecision::Confirm, |line| {
                        lines.push(line)
                    })
                    .await;
                lines.finish()?;

                match refunded {
                    Ok(_) => Ok(SessionOutcome::Refunded(ticket.id)),
                    Err(err) => {
                        self.output.write_line(&err.to_string())?;
                        Ok(SessionOutcome::RefundFailed(ticket.id))
                    }
                }
            }
        }
    }
}

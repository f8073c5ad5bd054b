use flight_booking_facade::{
    BookingFacade, ConsoleSession, LoggerListener, Messages, SessionOutcome, SharedWriter,
    TripInput, UserListener,
};
use std::io::Cursor;
use std::sync::Arc;

// Facade wired the way the binary wires it, with every line going to one buffer
fn console(input: &str, messages: Messages) -> (BookingFacade, ConsoleSession<Cursor<String>>, SharedWriter) {
    let output = SharedWriter::buffer();
    let facade = BookingFacade::with_default_airlines()
        .with_flight_numbers(123..=123)
        .unwrap();
    facade.register_listener(Arc::new(
        UserListener::new(output.clone()).with_prefix(messages.user_prefix),
    ));
    facade.register_listener(Arc::new(
        LoggerListener::new(output.clone()).with_prefix(messages.log_prefix),
    ));
    let session = ConsoleSession::new(Cursor::new(input.to_string()), output.clone(), messages);
    (facade, session, output)
}

#[tokio::test]
async fn test_book_then_decline() {
    let (facade, mut session, output) = console("Paris\nTokyo\nA\nno\n", Messages::english());

    let outcome = session.run(&facade, TripInput::default()).await.unwrap();

    assert!(matches!(outcome, SessionOutcome::Declined(_)));
    assert_eq!(
        output.contents(),
        "Enter departure city: Enter destination city: Choose an airline (A or B): \
         Searching flights on Airline A from Paris to Tokyo\n\
         Booking ticket for flight A123 on Airline A\n\
         Notification for user: Booking completed on Airline A for flight A123\n\
         Log: Booking completed on Airline A for flight A123\n\
         Do you want to refund the ticket? (Yes/No): Have a nice flight!\n"
    );
    assert_eq!(facade.open_ticket_count(), 1);
}

#[tokio::test]
async fn test_book_then_refund() {
    let (facade, mut session, output) = console("Paris\nTokyo\nB\nYes\n", Messages::english());

    let outcome = session.run(&facade, TripInput::default()).await.unwrap();

    let ticket = match outcome {
        SessionOutcome::Refunded(ticket) => ticket,
        other => panic!("Expected refund, got {:?}", other),
    };
    let refund_line = format!("Refunding ticket number {} on Airline B", ticket);
    let text = output.contents();
    let tail = format!(
        "Do you want to refund the ticket? (Yes/No): Refunding ticket...\n\
         {refund}\n\
         Notification for user: {refund}\n\
         Log: {refund}\n",
        refund = refund_line
    );
    assert!(text.ends_with(&tail), "unexpected transcript:\n{}", text);
    assert!(text.contains("Notification for user: Booking completed on Airline B for flight B123\n"));
    assert_eq!(facade.open_ticket_count(), 0);
}

#[tokio::test]
async fn test_unknown_airline_skips_refund() {
    let (facade, mut session, output) = console("Paris\nTokyo\nC\nyes\n", Messages::english());

    let outcome = session.run(&facade, TripInput::default()).await.unwrap();

    assert_eq!(outcome, SessionOutcome::InvalidSelection("C".to_string()));
    let text = output.contents();
    assert!(text.ends_with("Choose an airline (A or B): Invalid airline selection\n"));
    assert!(!text.contains("Notification"));
    assert!(!text.contains("refund"));
}

#[tokio::test]
async fn test_invalid_confirmation() {
    let (facade, mut session, output) = console("Paris\nTokyo\nA\nperhaps\n", Messages::english());

    let outcome = session.run(&facade, TripInput::default()).await.unwrap();

    assert!(matches!(outcome, SessionOutcome::InvalidConfirmation(_)));
    let text = output.contents();
    assert!(text.ends_with("(Yes/No): Invalid input. Please enter 'Yes' or 'No'.\n"));
    // Only the booking was announced
    assert_eq!(text.matches("Notification for user:").count(), 1);
    assert_eq!(facade.open_ticket_count(), 1);
}

#[tokio::test]
async fn test_russian_session() {
    let (facade, mut session, output) = console("Москва\nКазань\nA\nда\n", Messages::russian());

    let outcome = session.run(&facade, TripInput::default()).await.unwrap();

    assert!(matches!(outcome, SessionOutcome::Refunded(_)));
    let text = output.contents();
    assert!(text.starts_with(
        "Введите город отправления: Введите город назначения: Выберите авиакомпанию (A или B): "
    ));
    assert!(text.contains("Уведомление пользователю: Booking completed on Airline A for flight A123\n"));
    assert!(text.contains("Логирование: Booking completed on Airline A for flight A123\n"));
    assert!(text.contains("Вы хотите вернуть билет? (Да/Нет): Возврат билета...\n"));
}

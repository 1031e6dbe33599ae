use crate::api_client::BookingClient;
use crate::configuration_handler::{
    BookArguments, CancelArguments, Command, HoursArguments, SearchArguments,
};
use crate::date_utils::DateUtils;
use crate::http::start_server;
use crate::search_controller::{SearchController, SearchSettings, SearchState};
use crate::types::BookingRequest;
use anyhow::{bail, Context};
use futures::StreamExt;
use std::time::Duration;
use tracing::warn;

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve(arguments) => start_server(arguments)
            .await
            .context("mock booking server stopped"),
        Command::Search(arguments) => search(arguments).await,
        Command::Hours(arguments) => {
            hours(arguments);
            Ok(())
        }
        Command::Book(arguments) => book(arguments).await,
        Command::Cancel(arguments) => cancel(arguments).await,
    }
}

async fn search(arguments: SearchArguments) -> anyhow::Result<()> {
    let date_utils = DateUtils::default();
    if !date_utils.is_valid_future_date(&arguments.date) {
        bail!("{} is not today or a later date", arguments.date);
    }
    if !date_utils.time_options(&arguments.date).contains(&arguments.time) {
        warn!(time = %arguments.time, "Time is outside the selectable hours for this date");
    }

    let settings = SearchSettings {
        debounce: Duration::from_millis(arguments.debounce_ms),
        ..Default::default()
    };
    let controller = SearchController::with_settings(BookingClient::new(arguments.server), settings);
    let mut states = controller.subscribe();
    controller.search(&arguments.date, &arguments.time);

    let state = loop {
        match states.next().await {
            Some(state) if state.is_loading => continue,
            Some(state) => break state,
            None => bail!("search ended without a result"),
        }
    };

    print_search_result(&date_utils.format_date_for_display(&arguments.date), &state)
}

fn print_search_result(display_date: &str, state: &SearchState) -> anyhow::Result<()> {
    if !state.error.is_empty() {
        bail!("{}", state.error);
    }
    if state.slots.is_empty() {
        println!("No slots on {display_date}");
        return Ok(());
    }

    println!("Slots on {display_date}:");
    for slot in &state.slots {
        let status = match slot.available {
            true => "available",
            false => "booked",
        };
        println!("  {} - {}  {status}  ({})", slot.start_time, slot.end_time, slot.id);
    }
    Ok(())
}

fn hours(arguments: HoursArguments) {
    let date_utils = DateUtils::default();
    let date = arguments.date.unwrap_or_else(|| date_utils.today());

    if !date_utils.is_valid_future_date(&date) {
        println!("{date} is in the past");
        return;
    }

    let options = date_utils.time_options(&date);
    println!("{}:", date_utils.format_date_for_display(&date));
    if options.is_empty() {
        println!("  no hours left");
    }
    for option in options {
        println!("  {option}");
    }
}

async fn book(arguments: BookArguments) -> anyhow::Result<()> {
    let client = BookingClient::new(arguments.server);
    let request = BookingRequest {
        first_name: arguments.first_name,
        last_name: arguments.last_name,
        telephone: arguments.telephone,
        email: arguments.email,
        postcode: arguments.postcode,
        notes: arguments.notes,
        subject: arguments.subject.unwrap_or_default(),
        time: arguments.time.unwrap_or_default(),
        date: arguments.date.unwrap_or_default(),
    };

    let booking = client
        .book_appointment(&request)
        .await
        .context("booking failed")?;

    println!("Booking confirmed: {}", booking.appointment_id);
    println!("  {} on {} at {}", booking.subject, booking.date, booking.time);
    println!("  {} for {}", booking.duration, booking.customer_name);
    println!("  Confirmation sent to {}", booking.confirmation_email);
    Ok(())
}

async fn cancel(arguments: CancelArguments) -> anyhow::Result<()> {
    let client = BookingClient::new(arguments.server);
    let response = client
        .cancel_appointment(&arguments.appointment_id)
        .await
        .context("cancellation failed")?;

    if !response.cancelled {
        bail!("{} was not cancelled", arguments.appointment_id);
    }
    println!("Appointment {} cancelled", arguments.appointment_id);
    Ok(())
}

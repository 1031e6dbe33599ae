use crate::clock::{Clock, SystemClock};
use crate::configuration::Configuration;
use crate::date_utils::parse_date;
use crate::error::ApiError;
use crate::search_controller::{SERVICE_DURATION, SERVICE_TYPE};
use crate::slot_generator::{generate_time_slots, parse_hour};
use crate::types::{
    AvailabilityData, Booking, BookingRequest, BranchInfo, CancellationRequest,
    CancellationResponse, SearchAvailabilityRequest, SearchAvailabilityResponse,
};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use axum::{routing::post, Router};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const DEFAULT_SUBJECT: &str = "FHC Video";
const DEFAULT_BOOKING_TIME: &str = "17:30";
const DEFAULT_BOOKING_DATE: &str = "27th August";

type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

#[derive(Clone)]
pub struct AppState {
    clock: Arc<dyn Clock>,
    rng: SharedRng,
    response_delay: Duration,
}

impl AppState {
    pub fn new<C: Configuration>(configuration: &C) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            rng: Arc::new(Mutex::new(Box::new(StdRng::from_entropy()))),
            response_delay: configuration.response_delay(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Arc::new(Mutex::new(Box::new(rng)));
        self
    }

    fn roll<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&mut (dyn RngCore + Send + 'static)) -> T,
    ) -> Result<T, ApiError> {
        let mut rng = self.rng.lock().map_err(|err| ApiError::Internal {
            action,
            detail: err.to_string(),
        })?;
        Ok(f(&mut **rng))
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search-availability", post(search_availability))
        .route("/api/book-appointment", post(book_appointment))
        .route("/api/cancel-appointment", post(cancel_appointment))
        .with_state(state)
        .layer(cors)
}

pub async fn start_server<C: Configuration>(configuration: C) -> std::io::Result<()> {
    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Mock booking server listening");

    axum::serve(listener, create_app(AppState::new(&configuration))).await
}

async fn search_availability(
    State(state): State<AppState>,
    payload: Result<Json<SearchAvailabilityRequest>, JsonRejection>,
) -> Result<Json<SearchAvailabilityResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "Unreadable availability search");
            return Err(ApiError::MissingParameters);
        }
    };

    if request.date.is_empty() || request.time.is_empty() {
        return Err(ApiError::MissingParameters);
    }

    let date = parse_date(&request.date).ok_or(ApiError::InvalidDate)?;
    if date < state.clock.now().date() {
        return Err(ApiError::InvalidDate);
    }
    let requested_hour = parse_hour(&request.time).ok_or(ApiError::InvalidTime)?;

    tokio::time::sleep(state.response_delay).await;

    let slots = state.roll("searching for availability", |rng| {
        generate_time_slots(&request.date, requested_hour, rng)
    })?;
    info!(
        date = %request.date,
        time = %request.time,
        slots = slots.len(),
        "Availability generated"
    );

    let service_type = match request.service_type.is_empty() {
        true => SERVICE_TYPE.to_string(),
        false => request.service_type,
    };
    let duration = match request.duration {
        0 => SERVICE_DURATION,
        duration => duration,
    };

    Ok(Json(SearchAvailabilityResponse::success(AvailabilityData {
        date: request.date,
        service_type,
        duration,
        slots,
        branch_info: Some(BranchInfo {
            id: "branch_001".into(),
            name: "Main Branch".into(),
            address: "123 Banking Street, London, UK".into(),
        }),
    })))
}

async fn book_appointment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Booking>, ApiError> {
    let request = match body.is_empty() {
        true => BookingRequest::default(),
        false => serde_json::from_slice(&body).unwrap_or_else(|err| {
            warn!(%err, "Unreadable booking form, booking with defaults");
            BookingRequest::default()
        }),
    };
    let number = state.roll("booking the appointment", |rng| rng.gen_range(0..100_000_000u32))?;

    let booking = Booking {
        customer_name: format!("{} {}", request.first_name, request.last_name),
        subject: or_default(request.subject, DEFAULT_SUBJECT),
        duration: "60 minutes".into(),
        confirmation_email: request.email,
        appointment_id: format!("APBK-{number}"),
        time: or_default(request.time, DEFAULT_BOOKING_TIME),
        date: or_default(request.date, DEFAULT_BOOKING_DATE),
    };
    info!(appointment_id = %booking.appointment_id, "Appointment booked");

    Ok(Json(booking))
}

async fn cancel_appointment(
    payload: Result<Json<CancellationRequest>, JsonRejection>,
) -> Json<CancellationResponse> {
    match payload {
        Ok(Json(request)) => {
            info!(appointment_id = %request.appointment_id, "Appointment cancelled")
        }
        Err(rejection) => warn!(%rejection, "Cancellation without readable appointment id"),
    }
    Json(CancellationResponse { cancelled: true })
}

fn or_default(value: String, default: &str) -> String {
    match value.is_empty() {
        true => default.to_string(),
        false => value,
    }
}

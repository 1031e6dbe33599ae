use crate::error::ClientError;
use crate::types::{
    Booking, BookingRequest, CancellationRequest, CancellationResponse,
    SearchAvailabilityRequest, SearchAvailabilityResponse,
};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::debug;

/// Where the search controller sends availability lookups.
pub trait AvailabilitySource: Clone + Send + Sync + 'static {
    fn search_availability(
        &self,
        request: SearchAvailabilityRequest,
    ) -> impl Future<Output = Result<SearchAvailabilityResponse, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct BookingClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn book_appointment(&self, request: &BookingRequest) -> Result<Booking, ClientError> {
        self.post("/api/book-appointment", request).await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<CancellationResponse, ClientError> {
        let request = CancellationRequest {
            appointment_id: appointment_id.to_string(),
        };
        self.post("/api/cancel-appointment", &request).await
    }

    /// Error statuses still carry a JSON body, so the body is decoded
    /// regardless of status and only a non-JSON answer is an error.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|_| ClientError::Status { status, body: text })
    }
}

impl AvailabilitySource for BookingClient {
    async fn search_availability(
        &self,
        request: SearchAvailabilityRequest,
    ) -> Result<SearchAvailabilityResponse, ClientError> {
        self.post("/api/search-availability", &request).await
    }
}

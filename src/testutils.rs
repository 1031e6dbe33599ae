use crate::{
    api_client::AvailabilitySource,
    error::ClientError,
    search_controller::SearchState,
    slot_generator::parse_hour,
    types::{
        AvailabilityData, ErrorBody, SearchAvailabilityRequest, SearchAvailabilityResponse,
        TimeSlot,
    },
};
use futures::StreamExt;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio_stream::wrappers::WatchStream;

/// Hourly slots from `from_hour` through 17, alternating availability.
pub fn example_slots(date: &str, from_hour: u32) -> Vec<TimeSlot> {
    (from_hour..=17)
        .map(|hour| TimeSlot {
            id: format!("slot_{date}_{hour}00"),
            start_time: format!("{hour:02}:00"),
            end_time: format!("{:02}:00", hour + 1),
            available: hour % 2 == 0,
            booking_reference: (hour % 2 != 0).then(|| format!("booked_{hour}")),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum MockBehaviour {
    Slots,
    Failure(Option<String>),
    Unreachable,
}

pub struct MockAvailabilitySourceInner {
    pub calls_to_search_availability: AtomicU64,
    pub requests: Mutex<Vec<SearchAvailabilityRequest>>,
    pub behaviour: Mutex<MockBehaviour>,
    pub delays: Mutex<HashMap<String, Duration>>,
}

#[derive(Clone)]
pub struct MockAvailabilitySource(pub Arc<MockAvailabilitySourceInner>);

impl MockAvailabilitySource {
    pub fn new() -> Self {
        Self(Arc::new(MockAvailabilitySourceInner {
            calls_to_search_availability: AtomicU64::default(),
            requests: Mutex::default(),
            behaviour: Mutex::new(MockBehaviour::Slots),
            delays: Mutex::default(),
        }))
    }

    pub fn calls(&self) -> u64 {
        self.0.calls_to_search_availability.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SearchAvailabilityRequest> {
        self.0.requests.lock().unwrap().clone()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.0.behaviour.lock().unwrap() = behaviour;
    }

    pub fn set_delay(&self, time: &str, delay: Duration) {
        self.0.delays.lock().unwrap().insert(time.into(), delay);
    }

    fn respond(&self, request: &SearchAvailabilityRequest) -> Result<SearchAvailabilityResponse, ClientError> {
        match self.0.behaviour.lock().unwrap().clone() {
            MockBehaviour::Slots => {
                let hour = parse_hour(&request.time).unwrap_or(9);
                Ok(SearchAvailabilityResponse::success(AvailabilityData {
                    date: request.date.clone(),
                    service_type: request.service_type.clone(),
                    duration: request.duration,
                    slots: example_slots(&request.date, hour),
                    branch_info: None,
                }))
            }
            MockBehaviour::Failure(message) => Ok(SearchAvailabilityResponse {
                success: false,
                data: None,
                error: message.map(|message| ErrorBody {
                    code: "INVALID_DATE".into(),
                    message,
                }),
            }),
            MockBehaviour::Unreachable => Err(ClientError::Status {
                status: 502,
                body: "Bad Gateway".into(),
            }),
        }
    }
}

impl AvailabilitySource for MockAvailabilitySource {
    async fn search_availability(
        &self,
        request: SearchAvailabilityRequest,
    ) -> Result<SearchAvailabilityResponse, ClientError> {
        self.0
            .calls_to_search_availability
            .fetch_add(1, Ordering::SeqCst);
        self.0.requests.lock().unwrap().push(request.clone());

        let delay = self.0.delays.lock().unwrap().get(&request.time).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.respond(&request)
    }
}

pub async fn read_from_state_stream(stream: &mut WatchStream<SearchState>) -> SearchState {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("no state change within timeout")
        .expect("state stream closed")
}

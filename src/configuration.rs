use std::time::Duration;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    fn response_delay(&self) -> Duration;
}

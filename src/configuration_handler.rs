use crate::configuration::Configuration;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Bank appointment booking: mock server and client")]
pub struct ConfigurationHandler {
    #[command(subcommand)]
    pub command: Command,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the mock booking server
    Serve(ServeArguments),
    /// Look up available slots for a date and time
    Search(SearchArguments),
    /// List the hours still selectable for a date
    Hours(HoursArguments),
    /// Submit a booking
    Book(BookArguments),
    /// Cancel a booking
    Cancel(CancelArguments),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArguments {
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Simulated processing time of an availability search
    #[arg(long, default_value_t = 800)]
    pub response_delay_ms: u64,
}

impl Configuration for ServeArguments {
    fn port(&self) -> u16 {
        self.port
    }

    fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

#[derive(Debug, Clone, Args)]
pub struct SearchArguments {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Calendar date as YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    /// Start time as HH:mm
    #[arg(long)]
    pub time: String,

    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Args)]
pub struct HoursArguments {
    /// Calendar date as YYYY-MM-DD, today when omitted
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct BookArguments {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "+44")]
    pub telephone: String,

    #[arg(long, default_value = "")]
    pub postcode: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CancelArguments {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    #[arg(long)]
    pub appointment_id: String,
}

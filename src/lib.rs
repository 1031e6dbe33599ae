pub mod api_client;
pub mod availability_cache;
pub mod clock;
pub mod commands;
pub mod configuration;
pub mod configuration_handler;
pub mod date_utils;
pub mod error;
pub mod http;
pub mod search_controller;
pub mod slot_generator;
#[cfg(test)]
mod testutils;
pub mod types;

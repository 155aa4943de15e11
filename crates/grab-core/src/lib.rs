pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod fetch_head;
pub mod progress;
pub mod transfer;
pub mod url_model;

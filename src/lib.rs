pub mod cassettes;
pub mod config;
pub mod headshots;
pub mod http_client;
pub mod json_fields;
pub mod matcher;
pub mod names;
pub mod sleeper;
pub mod sportsdata;

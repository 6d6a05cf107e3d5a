pub mod handlers;
pub mod models;
pub mod queries;
pub mod routes;
pub mod startgg_client;

pub use startgg_client::{MatchSource, StartGgClient};

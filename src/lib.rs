extern crate chrono;
extern crate diesel;
extern crate tokio;

pub mod address;
pub mod bot;
pub mod config;
pub mod db;
pub mod errors;
pub mod filter;
pub mod logger;
pub mod models;
pub mod scan;
pub mod scrapers;

pub mod cache;
pub mod constraints;
pub mod controller;
pub mod fetcher;
pub mod http_fetcher;
pub mod listener;
pub mod logger;

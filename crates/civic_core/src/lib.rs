pub mod analytics;
pub mod clock;
pub mod config;
pub mod db;
pub mod demo;
pub mod domain;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod query;
pub mod status;
pub mod storage;
pub mod store;

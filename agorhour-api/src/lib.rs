use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod config;
pub mod error;
pub mod handlers;
pub mod hour;
pub mod meter;
pub mod routes;
pub mod service;
pub mod storage;

pub type DbConnection = Arc<Mutex<Connection>>;

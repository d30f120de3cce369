pub mod cards;
pub mod config;
pub mod countdown;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;

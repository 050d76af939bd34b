#![doc = "The `tallylist` library crate."]
#![doc = ""]
#![doc = "A to-do list web application whose accounts and rows live in a hosted"]
#![doc = "Supabase project. This crate holds the configuration, session handling,"]
#![doc = "backend client, HTML views and routing; `main.rs` assembles and runs the server."]

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod views;

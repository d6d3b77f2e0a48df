//! Ferry timetable server.
//!
//! A web service that answers: "Which ferries go from this stop to that
//! one around this time?" from recurring frequencies, seasons and
//! one-off schedule exceptions.

pub mod cache;
pub mod config;
pub mod domain;
pub mod store;
pub mod timetable;
pub mod web;

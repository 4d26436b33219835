//! Bus journey planner server.
//!
//! Loads a static bus network, then answers: "which buses do I take to get
//! from this stop to that one, leaving now?" using the per-stop timetables
//! published by the operator.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod network;
pub mod planner;
pub mod source;
pub mod timetable;
pub mod web;

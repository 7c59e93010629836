//! Client-side orchestration for a route-emissions viewer.
//!
//! A session that answers: "how far is this trip, how long does it take,
//! and what does it emit?" — and keeps an interactive map in sync with
//! the answer.

pub mod cache;
pub mod controller;
pub mod domain;
pub mod format;
pub mod location;
pub mod map;
pub mod polyline;
pub mod routes_api;

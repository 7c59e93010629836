//! Domain types for the route-emissions viewer.
//!
//! This module contains the core domain model types that represent
//! validated route data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod geo;
mod mode;
mod query;
mod route;

pub use geo::{BoundingRegion, GeoPoint};
pub use mode::{InvalidMode, TravelMode};
pub use query::{InvalidQuery, RouteQuery};
pub use route::RouteResult;

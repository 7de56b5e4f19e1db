//! collection-planner core
//!
//! Route optimization for municipal waste-collection stops: eligibility
//! filtering by fill level, interchangeable tour heuristics, and an adapter
//! for delegating the ordering to an external directions service.

pub mod traits;
pub mod stops;
pub mod haversine;
pub mod tour;
pub mod nearest_neighbor;
pub mod genetic;
pub mod annealing;
pub mod solver;
pub mod directions;
pub mod polyline;

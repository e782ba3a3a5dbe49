pub mod coordinates;
pub mod distance;
pub mod station;
pub mod trip;

pub use coordinates::Coordinates;
pub use distance::{DistanceMeters, DistanceMiles};
pub use station::{FuelStation, RouteStation};
pub use trip::{FuelPlan, OptimizeRequest, OptimizeResponse, PlannedStop, Route, TripPlan};

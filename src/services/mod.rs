pub mod fuel_planner;
pub mod google_maps;
pub mod openrouteservice;
pub mod routing_provider;
pub mod station_snapping;
pub mod trip_planner;

pub mod geocoding;
pub mod prediction_client;
pub mod predictor;
pub mod preprocessing;
pub mod route_planner;

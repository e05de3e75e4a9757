pub mod coordinates;
pub mod prediction;
pub mod trip;

pub use coordinates::Coordinates;
pub use prediction::PredictionResult;
pub use trip::{
    DayOfWeek, RawValue, TimeOfDay, TrafficConditions, TripAttributes, TripParameters, Weather,
};

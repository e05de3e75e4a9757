use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw trip attributes as posted to `/predict`.
///
/// Categorical fields stay free-form strings: the fitted encoder vocabulary,
/// not this type, decides which labels are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripAttributes {
    #[serde(rename = "Trip_Distance_km")]
    pub trip_distance_km: f64,
    #[serde(rename = "Time_of_Day")]
    pub time_of_day: String,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    #[serde(rename = "Passenger_Count")]
    pub passenger_count: f64,
    #[serde(rename = "Traffic_Conditions")]
    pub traffic_conditions: String,
    #[serde(rename = "Weather")]
    pub weather: String,
    #[serde(rename = "Base_Fare")]
    pub base_fare: f64,
    #[serde(rename = "Per_Km_Rate")]
    pub per_km_rate: f64,
    #[serde(rename = "Per_Minute_Rate")]
    pub per_minute_rate: f64,
    #[serde(rename = "Trip_Duration_Minutes")]
    pub trip_duration_minutes: f64,
}

/// A single cell of the raw feature row.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Label(String),
}

impl TripAttributes {
    /// Native column order of the feature row. The model must have been
    /// trained on exactly this order.
    pub const COLUMNS: [&'static str; 10] = [
        "Trip_Distance_km",
        "Time_of_Day",
        "Day_of_Week",
        "Passenger_Count",
        "Traffic_Conditions",
        "Weather",
        "Base_Fare",
        "Per_Km_Rate",
        "Per_Minute_Rate",
        "Trip_Duration_Minutes",
    ];

    /// Check every field constraint, collecting all violations.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let positive = [
            ("Trip_Distance_km", self.trip_distance_km),
            ("Base_Fare", self.base_fare),
            ("Per_Km_Rate", self.per_km_rate),
            ("Per_Minute_Rate", self.per_minute_rate),
            ("Trip_Duration_Minutes", self.trip_duration_minutes),
        ];
        for (field, value) in positive {
            if let Some(err) = check_finite(field, value) {
                errors.push(err);
            } else if value <= 0.0 {
                errors.push(
                    FieldError::body(field, "Input should be greater than 0", "greater_than")
                        .with_input(value),
                );
            }
        }

        if let Some(err) = check_finite("Passenger_Count", self.passenger_count) {
            errors.push(err);
        } else if self.passenger_count <= 0.0 {
            errors.push(
                FieldError::body(
                    "Passenger_Count",
                    "Input should be greater than 0",
                    "greater_than",
                )
                .with_input(self.passenger_count),
            );
        } else if self.passenger_count > 10.0 {
            errors.push(
                FieldError::body(
                    "Passenger_Count",
                    "Input should be less than or equal to 10",
                    "less_than_equal",
                )
                .with_input(self.passenger_count),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            // Keep the report in column order regardless of check order
            errors.sort_by_key(|e| {
                Self::COLUMNS
                    .iter()
                    .position(|c| e.loc.last().map(String::as_str) == Some(*c))
            });
            Err(errors)
        }
    }

    /// Materialize the trip as a single row of `(column, value)` pairs in
    /// native column order.
    pub fn to_row(&self) -> Vec<(&'static str, RawValue)> {
        use RawValue::{Label, Number};
        vec![
            (Self::COLUMNS[0], Number(self.trip_distance_km)),
            (Self::COLUMNS[1], Label(self.time_of_day.clone())),
            (Self::COLUMNS[2], Label(self.day_of_week.clone())),
            (Self::COLUMNS[3], Number(self.passenger_count)),
            (Self::COLUMNS[4], Label(self.traffic_conditions.clone())),
            (Self::COLUMNS[5], Label(self.weather.clone())),
            (Self::COLUMNS[6], Number(self.base_fare)),
            (Self::COLUMNS[7], Number(self.per_km_rate)),
            (Self::COLUMNS[8], Number(self.per_minute_rate)),
            (Self::COLUMNS[9], Number(self.trip_duration_minutes)),
        ]
    }
}

fn check_finite(field: &str, value: f64) -> Option<FieldError> {
    if value.is_finite() {
        None
    } else {
        Some(FieldError::body(field, "Input should be a finite number", "finite_number"))
    }
}

/// Generates a label enum with `Display`/`FromStr` over its training labels.
macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .copied()
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.label()).collect();
                        format!(
                            "Invalid {}: '{}'. Use one of: {}",
                            stringify!($name),
                            s,
                            options.join(", ")
                        )
                    })
            }
        }
    };
}

label_enum!(
    /// Time-of-day bucket used during training
    TimeOfDay {
        Morning => "Morning",
        Afternoon => "Afternoon",
        Evening => "Evening",
    }
);

label_enum!(DayOfWeek {
    Weekday => "Weekday",
    Weekend => "Weekend",
});

label_enum!(TrafficConditions {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

label_enum!(Weather {
    Clear => "Clear",
    Rain => "Rain",
    Fog => "Fog",
});

/// Everything but the distance: the parameters a user picks in either
/// client mode. Defaults mirror the client form.
#[derive(Debug, Clone, PartialEq)]
pub struct TripParameters {
    pub time_of_day: TimeOfDay,
    pub day_of_week: DayOfWeek,
    pub passenger_count: f64,
    pub traffic_conditions: TrafficConditions,
    pub weather: Weather,
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub per_minute_rate: f64,
    pub trip_duration_minutes: f64,
}

impl Default for TripParameters {
    fn default() -> Self {
        TripParameters {
            time_of_day: TimeOfDay::Morning,
            day_of_week: DayOfWeek::Weekday,
            passenger_count: 2.0,
            traffic_conditions: TrafficConditions::Medium,
            weather: Weather::Clear,
            base_fare: 3.5,
            per_km_rate: 1.5,
            per_minute_rate: 0.3,
            trip_duration_minutes: 25.0,
        }
    }
}

/// Input ranges offered by the client form (tighter than the API limits).
pub const FORM_DISTANCE_KM: (f64, f64) = (0.1, 100.0);
pub const FORM_PASSENGERS: (f64, f64) = (1.0, 10.0);
pub const FORM_BASE_FARE: (f64, f64) = (0.1, 20.0);
pub const FORM_PER_KM_RATE: (f64, f64) = (0.1, 10.0);
pub const FORM_PER_MINUTE_RATE: (f64, f64) = (0.01, 5.0);
pub const FORM_DURATION_MINUTES: (f64, f64) = (1.0, 300.0);

impl TripParameters {
    /// Check the form ranges before anything is sent to the service.
    pub fn check_form_ranges(&self) -> Result<(), Vec<FieldError>> {
        let checks = [
            ("Passenger_Count", self.passenger_count, FORM_PASSENGERS),
            ("Base_Fare", self.base_fare, FORM_BASE_FARE),
            ("Per_Km_Rate", self.per_km_rate, FORM_PER_KM_RATE),
            ("Per_Minute_Rate", self.per_minute_rate, FORM_PER_MINUTE_RATE),
            ("Trip_Duration_Minutes", self.trip_duration_minutes, FORM_DURATION_MINUTES),
        ];
        let errors: Vec<FieldError> = checks
            .into_iter()
            .filter_map(|(field, value, range)| check_range(field, value, range))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Complete the trip with a distance, from the form or a geocoded route.
    pub fn with_distance(&self, trip_distance_km: f64) -> TripAttributes {
        TripAttributes {
            trip_distance_km,
            time_of_day: self.time_of_day.to_string(),
            day_of_week: self.day_of_week.to_string(),
            passenger_count: self.passenger_count,
            traffic_conditions: self.traffic_conditions.to_string(),
            weather: self.weather.to_string(),
            base_fare: self.base_fare,
            per_km_rate: self.per_km_rate,
            per_minute_rate: self.per_minute_rate,
            trip_duration_minutes: self.trip_duration_minutes,
        }
    }
}

pub fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Option<FieldError> {
    if (min..=max).contains(&value) {
        None
    } else {
        Some(
            FieldError::body(
                field,
                format!("Input should be between {} and {}", min, max),
                "out_of_range",
            )
            .with_input(value),
        )
    }
}

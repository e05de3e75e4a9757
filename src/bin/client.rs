use std::env;
use std::sync::Arc;
use taxipred::config::ClientConfig;
use taxipred::error::AppError;
use taxipred::models::trip::{check_range, FORM_DISTANCE_KM};
use taxipred::models::{PredictionResult, TripAttributes, TripParameters};
use taxipred::services::geocoding::NominatimClient;
use taxipred::services::prediction_client::PredictionClient;
use taxipred::services::route_planner::{RouteEstimate, RoutePlanner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DISTANCE_KM: f64 = 15.5;
const DEFAULT_FROM: &str = "Stockholm";
const DEFAULT_TO: &str = "Göteborg";
const DEFAULT_ROUTE_DURATION_MINUTES: f64 = 180.0;

fn print_help() {
    eprintln!(
        "\
Usage: taxipred-client <COMMAND> [OPTIONS]

Commands:
  predict               Price a trip from its attributes
  route                 Geocode two places and price the trip between them
  status                Show the prediction service's discovery document

Trip options (both modes):
  --time=LABEL          Morning | Afternoon | Evening (default: Morning)
  --day=LABEL           Weekday | Weekend (default: Weekday)
  --passengers=N        1-10 (default: 2)
  --traffic=LABEL       Low | Medium | High (default: Medium)
  --weather=LABEL       Clear | Rain | Fog (default: Clear)
  --base-fare=F         0.1-20 SEK (default: 3.5)
  --km-rate=F           0.1-10 SEK (default: 1.5)
  --minute-rate=F       0.01-5 SEK (default: 0.3)
  --duration=MIN        1-300 minutes (default: 25, route: 180)

predict options:
  --distance=KM         0.1-100 km (default: 15.5)

route options:
  --from=PLACE          Starting location (default: Stockholm)
  --to=PLACE            Destination (default: Göteborg)

Environment:
  PREDICT_API_URL, GEOCODER_URL, GEOCODER_USER_AGENT,
  CLIENT_CONNECT_TIMEOUT_SECS, CLIENT_REQUEST_TIMEOUT_SECS"
    );
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("--{}=", name);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
}

fn parse_flag<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match flag(args, name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("Invalid --{} '{}': {}", name, raw, e)),
        None => Ok(default),
    }
}

fn parse_parameters(args: &[String], default_duration: f64) -> Result<TripParameters, String> {
    let defaults = TripParameters::default();
    Ok(TripParameters {
        time_of_day: parse_flag(args, "time", defaults.time_of_day)?,
        day_of_week: parse_flag(args, "day", defaults.day_of_week)?,
        passenger_count: parse_flag(args, "passengers", defaults.passenger_count)?,
        traffic_conditions: parse_flag(args, "traffic", defaults.traffic_conditions)?,
        weather: parse_flag(args, "weather", defaults.weather)?,
        base_fare: parse_flag(args, "base-fare", defaults.base_fare)?,
        per_km_rate: parse_flag(args, "km-rate", defaults.per_km_rate)?,
        per_minute_rate: parse_flag(args, "minute-rate", defaults.per_minute_rate)?,
        trip_duration_minutes: parse_flag(args, "duration", default_duration)?,
    })
}

fn render_price(prediction: &PredictionResult) {
    println!("Estimated Trip Price");
    println!("  {:.2} {}", prediction.predicted_price, prediction.currency);
}

fn render_trip_summary(trip: &TripAttributes) {
    println!();
    println!("Trip Summary:");
    println!("  - Distance: {} km", trip.trip_distance_km);
    println!("  - Duration: {} minutes", trip.trip_duration_minutes);
    println!("  - Time: {}, {}", trip.time_of_day, trip.day_of_week);
    println!("  - Traffic: {}", trip.traffic_conditions);
    println!("  - Weather: {}", trip.weather);
}

fn render_route(estimate: &RouteEstimate) {
    let route = &estimate.route;
    println!("Found locations! Distance: {:.2} km", route.distance_km);
    println!();
    render_price(&estimate.prediction);
    println!();
    println!("Route Summary:");
    println!(
        "  - From: {} ({:.4}, {:.4})",
        route.from, route.from_coordinates.lat, route.from_coordinates.lng
    );
    println!(
        "  - To: {} ({:.4}, {:.4})",
        route.to, route.to_coordinates.lat, route.to_coordinates.lng
    );
    println!(
        "  - Distance: {:.2} km (calculated from route)",
        route.distance_km
    );
    let center = route.from_coordinates.midpoint(&route.to_coordinates);
    println!("  - Map center: ({:.4}, {:.4})", center.lat, center.lng);
    println!("  - Duration: {} minutes", estimate.trip.trip_duration_minutes);
    println!(
        "  - Time: {}, {}",
        estimate.trip.time_of_day, estimate.trip.day_of_week
    );
    println!(
        "  - Traffic: {}, Weather: {}",
        estimate.trip.traffic_conditions, estimate.trip.weather
    );
}

fn form_error(errors: Vec<taxipred::error::FieldError>) -> Box<dyn std::error::Error> {
    AppError::Validation(errors).to_string().into()
}

async fn run_predict(
    args: &[String],
    client: &PredictionClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let distance_km: f64 = parse_flag(args, "distance", DEFAULT_DISTANCE_KM)?;
    let parameters = parse_parameters(args, TripParameters::default().trip_duration_minutes)?;

    let mut errors = parameters.check_form_ranges().err().unwrap_or_default();
    if let Some(err) = check_range("Trip_Distance_km", distance_km, FORM_DISTANCE_KM) {
        errors.insert(0, err);
    }
    if !errors.is_empty() {
        return Err(form_error(errors));
    }

    let trip = parameters.with_distance(distance_km);
    let prediction = client.predict(&trip).await?;

    println!("Prediction successful!");
    render_price(&prediction);
    render_trip_summary(&trip);
    Ok(())
}

async fn run_route(
    args: &[String],
    client: &PredictionClient,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let from = flag(args, "from").unwrap_or(DEFAULT_FROM);
    let to = flag(args, "to").unwrap_or(DEFAULT_TO);
    let parameters = parse_parameters(args, DEFAULT_ROUTE_DURATION_MINUTES)?;
    parameters.check_form_ranges().map_err(form_error)?;

    let geocoder = Arc::new(NominatimClient::new(config)?);
    let planner = RoutePlanner::new(geocoder);

    eprintln!("Geocoding {} and {}...", from, to);
    let estimate = planner.estimate(from, to, &parameters, client).await?;
    render_route(&estimate);
    Ok(())
}

async fn run_status(client: &PredictionClient) -> Result<(), Box<dyn std::error::Error>> {
    let info = client.service_info().await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env().map_err(|e| format!("Config error: {}", e))?;
    let client = PredictionClient::new(&config)?;

    match args[0].as_str() {
        "predict" => run_predict(&args[1..], &client).await,
        "route" => run_route(&args[1..], &client, &config).await,
        "status" => run_status(&client).await,
        other => Err(format!("Unknown command '{}'. Use --help for usage.", other).into()),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing (quiet by default, output is for humans)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxipred=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if let Err(e) = run(&args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

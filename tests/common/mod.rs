use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taxipred::artifacts::ModelArtifacts;
use taxipred::services::predictor::PredictionService;
use taxipred::AppState;

/// Directory holding the reference artifact set
#[allow(dead_code)]
pub fn fixture_model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models")
}

#[allow(dead_code)]
pub fn load_fixture_artifacts() -> Arc<ModelArtifacts> {
    Arc::new(
        ModelArtifacts::load(&fixture_model_dir()).expect("Failed to load fixture artifacts"),
    )
}

#[allow(dead_code)]
pub fn prediction_service() -> PredictionService {
    PredictionService::new(load_fixture_artifacts())
}

/// Router over the given artifacts, without CORS or tracing layers
#[allow(dead_code)]
pub fn app_with_artifacts(artifacts: Arc<ModelArtifacts>) -> axum::Router {
    let state = Arc::new(AppState {
        prediction_service: PredictionService::new(artifacts),
    });
    taxipred::routes::create_router(state)
}

#[allow(dead_code)]
pub fn setup_test_app() -> axum::Router {
    app_with_artifacts(load_fixture_artifacts())
}

/// Copy of the fixture artifacts in a scratch directory with one file
/// edited. The directory is removed on drop, including when a test panics.
#[allow(dead_code)]
pub struct ScratchArtifacts {
    dir: PathBuf,
}

#[allow(dead_code)]
impl ScratchArtifacts {
    pub fn new(name: &str, file: &str, edit: impl FnOnce(&mut Value)) -> Self {
        let dir = std::env::temp_dir().join(format!("taxipred-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let scratch = ScratchArtifacts { dir };

        for entry in fs::read_dir(fixture_model_dir()).unwrap() {
            let path = entry.unwrap().path();
            fs::copy(&path, scratch.dir.join(path.file_name().unwrap())).unwrap();
        }

        let target = scratch.dir.join(file);
        let mut value: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        edit(&mut value);
        fs::write(&target, value.to_string()).unwrap();
        scratch
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

impl Drop for ScratchArtifacts {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Serve the test app on an ephemeral local port
#[allow(dead_code)]
pub async fn spawn_test_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, setup_test_app()).await.unwrap();
    });
    addr
}

/// The documented example trip. Against the fixture artifacts it prices at
/// 40 + 0.1 * (-30 + 12 + 8 + 6) = 39.6 SEK.
#[allow(dead_code)]
pub fn reference_trip_json() -> Value {
    json!({
        "Trip_Distance_km": 15.5,
        "Time_of_Day": "Morning",
        "Day_of_Week": "Weekday",
        "Passenger_Count": 2.0,
        "Traffic_Conditions": "Medium",
        "Weather": "Clear",
        "Base_Fare": 3.5,
        "Per_Km_Rate": 1.5,
        "Per_Minute_Rate": 0.3,
        "Trip_Duration_Minutes": 25.0
    })
}

#[allow(dead_code)]
pub const REFERENCE_PRICE: f64 = 39.6;

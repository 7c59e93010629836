use std::sync::Arc;

use emissions_client::cache::{CacheConfig, CachedRouteService};
use emissions_client::controller::{AppState, OrchestrationController};
use emissions_client::domain::TravelMode;
use emissions_client::format;
use emissions_client::location::LocationResolver;
use emissions_client::map::{LoggingMapSurface, MapSurface, ViewportSynchronizer};
use emissions_client::polyline;
use emissions_client::routes_api::{RoutesApiClient, RoutesApiConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Get the service URL and map credential from the environment
    let base_url = std::env::var("ROUTES_API_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    if std::env::var("GOOGLE_MAPS_API_KEY").is_err() {
        eprintln!("Warning: GOOGLE_MAPS_API_KEY not set. Map tiles will not load.");
    }

    // Parse the query from the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (origin, destination, mode) = match args.as_slice() {
        [origin, destination] => (origin.clone(), destination.clone(), TravelMode::Drive),
        [origin, destination, mode] => match TravelMode::parse(&mode.to_uppercase()) {
            Ok(mode) => (origin.clone(), destination.clone(), mode),
            Err(e) => {
                eprintln!("{e} (expected DRIVE, TRANSIT, WALK, or BICYCLE)");
                std::process::exit(2);
            }
        },
        _ => {
            eprintln!("Usage: emissions-client <origin> <destination> [mode]");
            std::process::exit(2);
        }
    };

    // Create the route service: HTTP client behind a response cache
    let client = RoutesApiClient::new(RoutesApiConfig::new(&base_url))
        .expect("Failed to create routes client");
    let service = CachedRouteService::new(client, &CacheConfig::default());

    // No geolocation capability in a terminal session; the resolver falls
    // back to the default point.
    let resolver = LocationResolver::without_capability();

    let map: Arc<LoggingMapSurface> = Arc::new(LoggingMapSurface);
    let viewport = ViewportSynchronizer::new(map.clone());

    let controller = Arc::new(OrchestrationController::new(
        Arc::new(service),
        resolver,
        viewport,
    ));

    // Presentation: render each published state as it arrives
    let mut states = controller.subscribe();
    let surface = map.clone();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            match &state {
                AppState::LocatingUser => println!("Getting your location..."),
                AppState::Ready { location } => {
                    surface.render(*location, &[]);
                    println!(
                        "Map centred on {:.4}, {:.4}",
                        location.latitude, location.longitude
                    );
                }
                AppState::Submitting { .. } => println!("Calculating route..."),
                AppState::Success { location, result } => {
                    surface.render(*location, &polyline::decode(&result.encoded_path));
                }
                AppState::Failure { message, .. } => println!("{message}"),
                AppState::Idle => {}
            }
        }
    });

    controller.start().await;
    controller.submit(&origin, &destination, mode).await;

    match controller.state() {
        AppState::Success { result, .. } => {
            println!();
            println!("Route Information");
            println!("  Distance:  {}", format::format_distance_km(result.distance_meters));
            println!("  Duration:  {}", format::format_duration(result.duration_seconds));
            println!("  Emissions: {}", format::format_emissions(result.emissions_kg));
            println!("  Mode:      {}", format::format_mode(result.mode));
        }
        AppState::Failure { .. } => std::process::exit(1),
        _ => {}
    }
}

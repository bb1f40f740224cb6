use async_trait::async_trait;
use routemap::prelude::*;
use routemap::core::controller::RoutingMode;
use routemap::routing::client::ZipRouteQuery;
use routemap::suggest::selection::full_address_key;
use routemap::LatLng;

/// Headless demo session: loads a small location data set, runs suggestion
/// queries, plans a multi-destination route against a canned backend and
/// exercises the result table.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = AppController::new(AppConfig::default(), Box::new(CannedBackend));

    let source = StaticLocationSource::new(sample_locations());
    app.load_suggestions(&source).await;
    log::info!(
        "suggestion index ready with {} records",
        app.suggestions().len()
    );

    // Suggestion lookup, the way the frontend does on Enter
    for term in ["4006", "cluj", "40"] {
        match app.query_suggestions(term) {
            SuggestionOutcome::Matches(suggestions) => {
                println!("'{}' -> {} suggestion(s):", term, suggestions.len());
                for suggestion in &suggestions {
                    println!("  [{:>4}] {}", suggestion.score, suggestion.record.display_text);
                }
            }
            outcome => println!("'{}' -> {:?}", term, outcome),
        }
    }

    // Pick endpoints and route to two destinations
    if let SuggestionOutcome::Matches(suggestions) = app.query_suggestions("400001") {
        app.accept_start(suggestions[0].record.clone());
    }
    for term in ["400656", "407280"] {
        if let SuggestionOutcome::Matches(suggestions) = app.query_suggestions(term) {
            app.accept_destination(suggestions[0].record.clone());
        }
    }
    println!(
        "\nrouting {} -> {}",
        app.start_selection().postcode().unwrap_or("?"),
        app.destination_selection().zip_text()
    );

    let layer = app.route(RoutingMode::Multiple).await?;
    println!("route layer registered: {}", layer);

    print_table(&app);

    // Select the first row and show the highlight mirror following along
    let first_row = app.table().unwrap().table().rows()[0].id;
    app.toggle_table_row(first_row);
    println!("\nhighlights after selecting a row: {}", app.highlights().len());

    app.search_table(1, "cluj");
    print_table(&app);

    app.apply_table_filter(FilterAction::DeselectAll);
    println!("highlights after deselect-all: {}", app.highlights().len());

    // Chips can be removed by their full-address key
    if let Some(chip) = app.destination_selection().chips().first() {
        let key = full_address_key(&chip.record);
        app.remove_destination(&key);
    }
    println!(
        "destinations left: {}",
        app.destination_selection().placeholder_text()
    );

    Ok(())
}

fn print_table(app: &AppController) {
    let Some(engine) = app.table() else {
        return;
    };
    let table = engine.table();

    println!("\n== {} ==", table.title());
    println!("{}", table.columns().join(" | "));
    for row in table.rows() {
        if row.hidden {
            continue;
        }
        let cells: Vec<&str> = row.cells().iter().map(|c| c.content()).collect();
        let marker = if row.selected { "*" } else { " " };
        println!("{} {}", marker, cells.join(" | "));
    }
}

/// The demo's stand-in for the routing backend: one canned leg per
/// requested destination.
struct CannedBackend;

#[async_trait]
impl RoutingBackend for CannedBackend {
    async fn zip_routes(&self, query: &ZipRouteQuery) -> routemap::Result<RouteResponse> {
        let legs: Vec<RouteLeg> = query
            .end_zips
            .split(", ")
            .enumerate()
            .map(|(i, zip)| canned_leg(zip, &query.end_addresses[i], &query.end_cities[i]))
            .collect();
        Ok(RouteResponse::Multi {
            start: point_collection(23.6031, 46.7633),
            legs,
        })
    }

    async fn zip_roundtrip(&self, query: &ZipRouteQuery) -> routemap::Result<RouteResponse> {
        let legs: Vec<RouteLeg> = query
            .end_zips
            .split(", ")
            .enumerate()
            .map(|(i, zip)| canned_leg(zip, &query.end_addresses[i], &query.end_cities[i]))
            .collect();
        let sequence = format!("{} → {} → {}", query.start_zip, query.end_zips, query.start_zip);
        Ok(RouteResponse::RoundTrip {
            start: point_collection(23.6031, 46.7633),
            legs,
            total_distance: 4821.7,
            waypoint_sequence: sequence,
        })
    }

    async fn address_route(
        &self,
        _start: &LatLng,
        _end: &LatLng,
    ) -> routemap::Result<RouteResponse> {
        Ok(RouteResponse::Single {
            start: point_collection(23.6031, 46.7633),
            leg: canned_leg("400001", "-", "Cluj-Napoca"),
        })
    }

    async fn store_layer(&self, id: LayerId, _data: &GeoJson) -> routemap::Result<()> {
        log::debug!("stored {}", id);
        Ok(())
    }

    async fn delete_layer(&self, id: LayerId) -> routemap::Result<()> {
        log::debug!("deleted {}", id);
        Ok(())
    }

    async fn layer_data(&self, _id: LayerId) -> routemap::Result<GeoJson> {
        Ok(GeoJson::empty())
    }
}

fn point_collection(lng: f64, lat: f64) -> GeoJson {
    serde_json::from_value(serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "geometry": {"type": "Point", "coordinates": [lng, lat]},
            "properties": {}
        }]
    }))
    .expect("static demo geometry")
}

fn canned_leg(postcode: &str, address: &str, city: &str) -> RouteLeg {
    let route = serde_json::from_value(serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[23.6031, 46.7633], [23.61, 46.78]]
            },
            "properties": {
                "address": address,
                "city": city,
                "postcode": postcode,
                "length": 1204.5
            }
        }]
    }))
    .expect("static demo geometry");

    RouteLeg {
        end: point_collection(23.61, 46.78),
        route,
    }
}

fn sample_locations() -> GeoJson {
    let locations = [
        ("400001", "Cluj-Napoca", "-", "locality"),
        ("400656", "Cluj-Napoca", "Strada Câmpului", "street"),
        ("400604", "Cluj-Napoca", "Strada Observatorului", "street"),
        ("407280", "Florești", "Strada Eroilor", "street"),
        ("401104", "Turda", "Strada Libertății", "street"),
    ];

    let features: Vec<serde_json::Value> = locations
        .iter()
        .map(|(postcode, city, address, kind)| {
            serde_json::json!({
                "geometry": {"type": "Point", "coordinates": [23.6, 46.77]},
                "properties": {
                    "postcode": postcode,
                    "city": city,
                    "address": address,
                    "type": kind
                }
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "type": "FeatureCollection",
        "features": features
    }))
    .expect("static demo data")
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::DVec2;
use railmap_api::{ApiConfig, HttpTrainApi, Journey};
use railmap_core::prelude::*;
use tracing_subscriber::EnvFilter;

mod output;

use output::{route_to_geojson, stations_to_geojson, write_geojson};

#[derive(Parser, Debug)]
#[command(
    name = "railmap-inspect",
    author,
    version,
    about = "Inspect a station dataset and exercise the rail map engine",
    long_about = "Loads a TIPLOC export and runs the map engine against an in-memory \
                  surface: dataset summaries, station search, approximate routes as \
                  GeoJSON, viewport renders and click tests, and live lookups against \
                  the train data API."
)]
struct Args {
    /// TIPLOC export JSON
    #[arg(short, long, global = true, default_value = "tiplocs.json")]
    data: PathBuf,

    /// Engine config overrides (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Station counts and the extent of the mappable set
    Summary,

    /// Search stations by name, CRS or TIPLOC
    Search {
        query: String,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Approximate route between two TIPLOC codes, as GeoJSON
    Route {
        from: String,
        to: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a viewport and optionally click on it
    View {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
        #[arg(long)]
        zoom: Option<f64>,
        #[arg(long, default_value = "1024")]
        width: f64,
        #[arg(long, default_value = "768")]
        height: f64,
        /// Screen point to hit test, as `x,y`
        #[arg(long)]
        click: Option<String>,
        /// Show only this station
        #[arg(long)]
        highlight: Option<String>,
        /// Basemap to report tiles for (standard, open-street, satellite, dark)
        #[arg(long, default_value = "standard")]
        basemap: Basemap,
        /// Write the stations inside the viewport as GeoJSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up a station's coordinates through the API and fly to them
    Locate { code: String },

    /// Today's services calling at a station
    Schedule {
        code: String,
        /// Show the approximate route of the n-th service
        #[arg(long)]
        select: Option<usize>,
    },

    /// Full calling pattern of one train, as returned by the API
    Timeline { train_id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .without_time()
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let stations = load_stations(&args.data)?;

    match args.command {
        Command::Summary => summary(&stations),
        Command::Search { query, limit } => search(&stations, &query, limit),
        Command::Route { from, to, output } => {
            route(stations, config, &from, &to, output.as_deref())
        }
        Command::View {
            lat,
            lng,
            zoom,
            width,
            height,
            click,
            highlight,
            basemap,
            output,
        } => {
            let mut engine = headless_engine(stations.clone(), config, DVec2::new(width, height));
            engine.set_basemap(basemap);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                let mut target = ViewTarget::new(lat, lng);
                if let Some(zoom) = zoom {
                    target = target.with_zoom(zoom);
                }
                engine.request_explicit_target(target);
            }
            view(&mut engine, &stations, click.as_deref(), highlight, output.as_deref())
        }
        Command::Locate { code } => locate(stations, config, &code).await,
        Command::Schedule { code, select } => schedule(stations, config, &code, select).await,
        Command::Timeline { train_id } => timeline(stations, config, &train_id).await,
    }
}

fn load_stations(path: &Path) -> Result<Arc<StationIndex>> {
    if !path.exists() {
        bail!("Dataset does not exist: {}", path.display());
    }
    let index = load_export(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    Ok(Arc::new(index))
}

fn headless_engine(
    stations: Arc<StationIndex>,
    config: EngineConfig,
    size: DVec2,
) -> MapEngine<HeadlessSurface> {
    let surface = HeadlessSurface::new(config.default_camera(), size);
    MapEngine::new(surface, stations, config)
}

fn summary(stations: &StationIndex) -> Result<()> {
    println!("Stations:   {}", stations.len());
    println!("Mappable:   {}", stations.mappable_len());
    println!("Unmappable: {}", stations.len() - stations.mappable_len());
    match stations.extent() {
        Some(extent) => println!(
            "Extent:     lat {:.4}..{:.4}, lng {:.4}..{:.4}",
            extent.min().y,
            extent.max().y,
            extent.min().x,
            extent.max().x
        ),
        None => println!("Extent:     (none)"),
    }
    Ok(())
}

fn search(stations: &StationIndex, query: &str, limit: usize) -> Result<()> {
    let hits = stations.search(query, limit);
    if hits.is_empty() {
        println!("No stations match {query:?}");
    }
    for station in hits {
        let place = match station.lat_lng() {
            Some((lat, lng)) => format!("{lat:.4}, {lng:.4}"),
            None => "unmappable".to_string(),
        };
        println!("{}  ({place})", station.summary().join(" | "));
    }
    Ok(())
}

fn route(
    stations: Arc<StationIndex>,
    config: EngineConfig,
    from: &str,
    to: &str,
    output: Option<&Path>,
) -> Result<()> {
    let builder = RouteBuilder::new(stations, &config);
    let journey = Journey::between("inspect", from.to_uppercase(), to.to_uppercase());
    let path = builder.build_route(&journey);
    if path.is_empty() {
        bail!("No route: {from} or {to} is unknown or has no coordinates");
    }

    for (point, stop) in path.iter() {
        tracing::debug!(label = %stop.label, role = ?stop.role, lat = point.y(), lng = point.x(), "stop");
    }
    write_geojson(&route_to_geojson(&path), output)
}

fn view(
    engine: &mut MapEngine<HeadlessSurface>,
    stations: &StationIndex,
    click: Option<&str>,
    highlight: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    engine.pump();
    if let Some(code) = highlight {
        let code = StationIdentifier::new(code.to_uppercase());
        if stations.get(&code).is_none() {
            bail!("Unknown station: {code}");
        }
        engine.set_layer_mode(LayerMode::Highlighted(code));
    }

    let viewport = engine.surface().viewport();
    let markers = engine.surface().markers();
    println!(
        "Camera: {:.4}, {:.4} @ zoom {:.2}",
        viewport.camera.lat(),
        viewport.camera.lng(),
        viewport.zoom()
    );
    println!("Markers drawn: {}", markers.len());
    let basemap = engine.surface().basemap();
    println!("Basemap: {basemap} ({})", basemap.url_template());
    if let Some(nearest) = stations.nearest_stations(viewport.camera.center, 1).first() {
        println!("Nearest to centre: {}", nearest.summary().join(" | "));
    }
    println!(
        "Hit radius: {:.2}px",
        engine.config().pick_threshold_px(viewport.zoom())
    );

    if let Some(click) = click {
        let screen = parse_screen_point(click)?;
        match engine.click(screen) {
            Some(station) => println!("Picked: {}", station.summary().join(" | ")),
            None => println!("Picked: nothing"),
        }
    }

    if let Some(path) = output {
        let visible = stations.stations_in_bounds(viewport.bounds());
        write_geojson(&stations_to_geojson(visible.iter().map(|s| s.as_ref())), Some(path))?;
    }
    Ok(())
}

async fn locate(stations: Arc<StationIndex>, config: EngineConfig, code: &str) -> Result<()> {
    let api = HttpTrainApi::new(ApiConfig::from_env());
    let mut engine = headless_engine(stations, config, DVec2::new(1024.0, 768.0));

    match engine.search_station(&api, &code.to_uppercase()).await {
        LookupOutcome::Applied(target) | LookupOutcome::Unchanged(target) => {
            engine.pump();
            println!("{code}: {:.5}, {:.5}", target.lat, target.lng);
            println!("Markers drawn: {}", engine.surface().markers().len());
            Ok(())
        }
        LookupOutcome::Failed(notice) => bail!("{}: {}", notice.title, notice.message),
        LookupOutcome::Stale => Ok(()),
    }
}

async fn schedule(
    stations: Arc<StationIndex>,
    config: EngineConfig,
    code: &str,
    select: Option<usize>,
) -> Result<()> {
    let api = HttpTrainApi::new(ApiConfig::from_env());
    let mut engine = headless_engine(stations, config, DVec2::new(1024.0, 768.0));

    let journeys = match engine.load_schedule(&api, &code.to_uppercase()).await {
        LookupOutcome::Applied(journeys) | LookupOutcome::Unchanged(journeys) => journeys,
        LookupOutcome::Failed(notice) => bail!("{}: {}", notice.title, notice.message),
        LookupOutcome::Stale => return Ok(()),
    };

    if journeys.is_empty() {
        println!("No services today");
    }
    for (index, journey) in journeys.iter().enumerate() {
        println!("{:>3}  {}", index, describe(journey));
    }

    if let Some(index) = select {
        let Some(journey) = journeys.get(index) else {
            bail!("No service at index {index}");
        };
        engine.select_journey(Some(journey));
        engine.pump();

        let route = engine.route();
        if route.is_empty() {
            println!("Route unavailable: endpoints missing from the dataset");
        } else {
            for stop in &route.stops {
                println!("  {:<12} {}", format!("{:?}", stop.role), stop.label);
            }
        }
    }
    Ok(())
}

async fn timeline(stations: Arc<StationIndex>, config: EngineConfig, train_id: &str) -> Result<()> {
    let api = HttpTrainApi::new(ApiConfig::from_env());
    let mut engine = headless_engine(stations, config, DVec2::new(1024.0, 768.0));

    match engine.load_full_schedule(&api, train_id).await {
        LookupOutcome::Applied(schedule) | LookupOutcome::Unchanged(schedule) => {
            println!("{}", serde_json::to_string_pretty(&schedule)?);
            Ok(())
        }
        LookupOutcome::Failed(notice) => bail!("{}: {}", notice.title, notice.message),
        LookupOutcome::Stale => Ok(()),
    }
}

fn describe(journey: &Journey) -> String {
    let departs = journey
        .scheduled_departure_time()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let status = if journey.cancelled { " (cancelled)" } else { "" };
    format!(
        "{departs} {} {} -> {}{status}",
        journey.head_code, journey.origin_location, journey.destination_location
    )
}

fn parse_screen_point(raw: &str) -> Result<DVec2> {
    let (x, y) = raw
        .split_once(',')
        .with_context(|| format!("Expected x,y but got {raw:?}"))?;
    let x: f64 = x.trim().parse().with_context(|| format!("Bad x in {raw:?}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("Bad y in {raw:?}"))?;
    Ok(DVec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_screen_points() {
        let point = parse_screen_point("512, 384.5").unwrap();
        assert_relative_eq!(point.x, 512.0);
        assert_relative_eq!(point.y, 384.5);

        assert!(parse_screen_point("512").is_err());
        assert!(parse_screen_point("a,b").is_err());
    }

    #[test]
    fn describes_cancelled_journeys() {
        let mut journey = Journey::between("t1", "EUSTON", "MNCRPIC")
            .with_locations("London Euston", "Manchester Piccadilly");
        journey.head_code = "1H05".into();
        journey.scheduled_departure = "2025-12-01T07:15:00".into();
        journey.cancelled = true;

        assert_eq!(
            describe(&journey),
            "07:15 1H05 London Euston -> Manchester Piccadilly (cancelled)"
        );
    }

    #[test]
    fn cli_arguments_parse() {
        let args = Args::try_parse_from([
            "railmap-inspect",
            "--data",
            "stations.json",
            "view",
            "--lat",
            "51.5",
            "--lng=-0.1",
            "--click",
            "10,20",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::View { lat: Some(_), .. }));

        let args = Args::try_parse_from(["railmap-inspect", "timeline", "202412017654321"]).unwrap();
        assert!(matches!(args.command, Command::Timeline { train_id } if train_id == "202412017654321"));
    }
}

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hifitime::Epoch;
use tracing::info;

use skywatch::bodies::{Body, Locale};
use skywatch::config::SkyConfig;
use skywatch::ephemeris::analytic::AnalyticEphemeris;
use skywatch::ephemeris::EphemerisOracle;
use skywatch::logging::init_logging;
use skywatch::moon_phase::MoonPhaseName;
use skywatch::observers::{LocationFix, Observer};
use skywatch::projection::{needle_frame, sky_markers, thermometer_frame};
use skywatch::sky_errors::SkyError;
use skywatch::time::{Clock, SystemClock};
use skywatch::visibility::{BodyFilter, VisibilityClassifier, VisibilityResult};
use skywatch::watcher::{LocationStatus, SkyState, SkyWatcher};

#[derive(Parser)]
#[command(name = "skywatch", about = "Which planets, Moon and Sun can be seen now")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Observer latitude in degrees (overrides the configuration)
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,
    /// Observer longitude in degrees, east positive
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,
    /// Observer elevation in meters
    #[arg(long, global = true, allow_hyphen_values = true)]
    elevation: Option<f64>,
    /// Offset of the displayed clock from UTC, minutes
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
    /// Display language: en or pt-BR
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the tracked bodies once
    List {
        /// UTC instant (e.g. 2025-06-21T23:00:00 UTC); defaults to now
        #[arg(long)]
        at: Option<String>,
        /// List filter: all, planet, star, satellite, favorites
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Refresh the classification periodically until interrupted
    Watch,
    /// Position, magnitude and compass frames of one body
    Compass {
        /// Body name or slug, in English or Portuguese
        body: String,
        /// Device heading in degrees
        #[arg(long, default_value = "0")]
        heading: f64,
        /// Device pitch in degrees
        #[arg(long, default_value = "90")]
        pitch: f64,
        #[arg(long)]
        at: Option<String>,
    },
    /// Current moon phase
    Phase {
        #[arg(long)]
        at: Option<String>,
    },
}

fn resolve_config(cli: &Cli) -> Result<SkyConfig, SkyError> {
    let mut config = match &cli.config {
        Some(path) => SkyConfig::from_file(path)?,
        None => SkyConfig::default(),
    };

    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        config.observer = Some(LocationFix {
            latitude,
            longitude,
            altitude: cli.elevation,
        });
    }
    if let Some(offset) = cli.utc_offset_minutes {
        config.utc_offset_minutes = offset;
    }
    if let Some(locale) = &cli.locale {
        config.locale = Locale::from_str(locale)?;
    }

    config.validate()?;
    Ok(config)
}

fn resolve_epoch(at: &Option<String>) -> Result<Epoch, SkyError> {
    match at {
        Some(text) => Ok(Epoch::from_str(text)?),
        None => SystemClock.now(),
    }
}

fn observer_of(config: &SkyConfig) -> Result<Observer, SkyError> {
    let fix = config.observer.ok_or_else(|| {
        SkyError::InvalidObserver("no location: pass --lat/--lon or set [observer]".into())
    })?;
    Observer::try_from(fix)
}

fn print_result(result: &VisibilityResult, locale: Locale) {
    let (now_title, soon_title) = match locale {
        Locale::English => ("Visible now", "Visible soon"),
        Locale::PortugueseBr => ("Visíveis agora", "Visíveis em breve"),
    };

    for (title, entries) in [(now_title, &result.now), (soon_title, &result.soon)] {
        println!("{title}");
        if entries.is_empty() {
            println!("  -");
        }
        for entry in entries {
            println!(
                "  {:<10} {:<8} {:<16} az {:>6.2}°  alt {:>6.2}°",
                entry.body.display_name(locale),
                entry.body.kind().label(locale),
                entry.display_time,
                entry.position.azimuth,
                entry.position.altitude
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), SkyError> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(&config.log_level)?;

    let oracle = AnalyticEphemeris::new();

    match &cli.command {
        Commands::List { at, filter } => {
            let observer = observer_of(&config)?;
            let epoch = resolve_epoch(at)?;
            let filter = BodyFilter::parse(filter, config.favorite_bodies())?;

            let classifier = VisibilityClassifier::new(oracle, config.settings()?);
            let result = classifier.classify(&observer, epoch).filtered(&filter);
            print_result(&result, config.locale);

            for alert in result.favorite_alerts(&config.favorite_bodies(), config.locale) {
                println!("{}: {}", alert.title, alert.message);
            }
        }
        Commands::Watch => {
            let status = match config.observer {
                Some(fix) => LocationStatus::Granted(Observer::try_from(fix)?),
                None => LocationStatus::Denied,
            };
            let classifier = VisibilityClassifier::new(oracle, config.settings()?);
            let watcher = SkyWatcher::new(classifier, Arc::new(SystemClock), config.poll_interval());
            let handle = watcher.spawn(Some(status));
            let mut updates = handle.subscribe();

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupted");
                        break;
                    }
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = updates.borrow_and_update().clone();
                        match state {
                            SkyState::Pending => {}
                            SkyState::PermissionRequired => {
                                println!("Location permission required");
                            }
                            SkyState::Ready(snapshot) => {
                                println!("--- {} ---", snapshot.computed_at);
                                print_result(&snapshot.result, config.locale);
                            }
                        }
                    }
                }
            }

            handle.shutdown().await?;
        }
        Commands::Compass {
            body,
            heading,
            pitch,
            at,
        } => {
            let body = Body::from_slug(body)?;
            let observer = observer_of(&config)?;
            let epoch = resolve_epoch(at)?;

            let position = oracle.horizontal(body, epoch, &observer)?;
            let illumination = oracle.illumination(body, epoch)?;

            println!("{}", body.display_name(config.locale));
            println!("  azimuth    {:.2}°", position.azimuth);
            println!("  altitude   {:.2}°", position.altitude);
            println!("  magnitude  {:.2}", illumination.magnitude);
            println!("  needle     {}°", needle_frame(position.azimuth, *heading));
            println!("  level      {}°", thermometer_frame(*pitch));

            println!("Sky markers");
            for marker in sky_markers(&oracle, &observer, epoch, &Body::TRACKED) {
                println!(
                    "  {:<10} x {:>6.2}  y {:>6.2}  z {:>6.2}",
                    marker.body.display_name(config.locale),
                    marker.scene.x,
                    marker.scene.y,
                    marker.scene.z
                );
            }
        }
        Commands::Phase { at } => {
            let epoch = resolve_epoch(at)?;
            let angle = oracle.moon_phase(epoch)?;
            let phase = MoonPhaseName::from_phase_angle(angle);
            println!("{} ({angle:.1}°)", phase.label(config.locale));
        }
    }

    Ok(())
}

#[cfg(test)]
mod main_test {
    use super::*;

    #[test]
    fn test_location_flags_come_in_pairs() {
        assert!(Cli::try_parse_from(["skywatch", "--lat", "-23.5", "phase"]).is_err());
        assert!(Cli::try_parse_from(["skywatch", "--lon", "-46.6", "phase"]).is_err());

        let cli = Cli::try_parse_from(["skywatch", "--lat", "-23.5", "--lon", "-46.6", "phase"])
            .unwrap();
        assert_eq!(cli.lat, Some(-23.5));
        assert_eq!(cli.lon, Some(-46.6));
    }

    #[test]
    fn test_flags_override_observer() {
        let cli = Cli::try_parse_from([
            "skywatch",
            "list",
            "--lat",
            "38.7",
            "--lon",
            "-9.1",
            "--elevation",
            "50",
        ])
        .unwrap();
        let observer = observer_of(&resolve_config(&cli).unwrap()).unwrap();
        assert_eq!(observer.latitude(), 38.7);
        assert_eq!(observer.longitude(), -9.1);
    }
}

//! Keeps a list of nearby places, sorted by distance, in sync with a changing list of places.
//!
//! Run with an optional path to a TOML file (see `places.toml`) and `RUST_LOG=debug` to watch the
//! derived sequences at work.

use std::{cell::Cell, env, fs, rc::Rc};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use tandem_derived::{DerivedSequence, DerivedView, EngineSettings};
use tandem_sequence::{ObservableSequence, ObservableVec, SequenceChange};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct Place {
    name: String,
    x: f64,
    y: f64,
    #[serde(default)]
    favorite: bool,
}

impl Place {
    fn new(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            favorite: false,
        }
    }

    /// Distance from home in km.
    fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    radius: f64,
    engine: EngineSettings,
    places: Vec<Place>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 5.0,
            engine: EngineSettings::default(),
            places: vec![
                Place::new("Station", 0.5, -0.5),
                Place::new("Harbor", 6.0, 2.0),
                Place::new("Library", -1.0, 2.5),
                Place::new("Museum", 3.0, 3.5),
            ],
        }
    }
}

impl Config {
    fn load() -> Result<Self> {
        let Some(path) = env::args().nth(1) else {
            return Ok(Self::default());
        };
        let toml = fs::read_to_string(&path).with_context(|| format!("Failed to read `{path}`"))?;
        toml::from_str(&toml).with_context(|| format!("Failed to parse `{path}`"))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load()?;
    info!("Radius: {} km, engine: {:?}", config.radius, config.engine);

    let places = Rc::new(ObservableVec::from(config.places));
    let radius = Rc::new(Cell::new(config.radius));

    let within = radius.clone();
    let mut nearby = DerivedSequence::builder(Place::clone)
        .filter(move |place| place.distance() <= within.get())
        .sort_by(|a, b| a.distance().total_cmp(&b.distance()))
        .settings(config.engine)
        .source(places.clone())
        .build()?;

    // Labels follow the sorted list, not the places themselves.
    let labels = DerivedSequence::builder(|place: &Place| {
        format!("{} ({:.1} km)", place.name, place.distance())
    })
    .source(nearby.view().as_source())
    .build()?;

    let favorites = DerivedSequence::builder(|place: &Place| place.name.clone())
        .filter(|place| place.favorite)
        .source(places.clone())
        .build()?;

    log_changes("nearby", &labels.view());
    log_changes("favorites", &favorites.view());

    print("Initially", &labels, &favorites);

    places.push(Place::new("Bakery", 1.0, 1.5));
    print("A bakery opened", &labels, &favorites);

    if let Some(index) = position(&places, "Library") {
        let mut library = places.get(index).context("Library vanished")?;
        library.favorite = true;
        places.replace(index, library);
        print("Library marked as favorite", &labels, &favorites);
    }

    if let Some(index) = position(&places, "Station") {
        places.remove(index);
        print("The station closed", &labels, &favorites);
    }

    radius.set(radius.get() * 2.0);
    nearby.refresh();
    print(
        &format!("Radius widened to {} km", radius.get()),
        &labels,
        &favorites,
    );

    Ok(())
}

fn position(places: &ObservableVec<Place>, name: &str) -> Option<usize> {
    places.with_items(|places| places.iter().position(|place| place.name == name))
}

fn log_changes(name: &'static str, view: &DerivedView<String>) {
    view.subscribe(Rc::new(move |change: &SequenceChange<String>| {
        info!("{name}: {change:?}");
    }));
}

fn print(
    title: &str,
    nearby: &DerivedSequence<Place, String>,
    favorites: &DerivedSequence<Place, String>,
) {
    println!("{title}:");
    println!("  nearby:    {}", nearby.to_vec().join(", "));
    println!("  favorites: {}", favorites.to_vec().join(", "));
}

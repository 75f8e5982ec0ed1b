use std::sync::Arc;

use flight_feed::FlightSource;
use logger::Logger;

pub mod config;
mod map;
mod plugins;
pub mod popup;
pub mod registry;
pub mod scheduler;
mod state;
pub mod sync;
mod widgets;
mod windows;

pub use config::MapConfig;
pub use map::MapController;

/// Opens the map window and keeps it in sync with `source` until it is closed.
pub fn run(
    config: MapConfig,
    source: Arc<dyn FlightSource>,
    logger: Logger,
) -> Result<(), eframe::Error> {
    eframe::run_native(
        "Live Flights",
        Default::default(),
        Box::new(move |cc| {
            Ok(Box::new(MapController::new(
                cc.egui_ctx.clone(),
                config,
                source,
                logger,
            )?))
        }),
    )
}

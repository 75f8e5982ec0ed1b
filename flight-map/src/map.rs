use std::{
    cell::RefCell,
    rc::Rc,
    sync::{mpsc::Receiver, Arc},
};

use egui::Context;
use egui_extras::install_image_loaders;
use flight_feed::FlightSource;
use logger::{Color, Logger};
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Position, Tiles};

use crate::{
    config::MapConfig,
    plugins,
    scheduler::{SchedulerError, SyncHandle, SyncScheduler},
    state::SelectionState,
    sync::{FlightSync, SyncCycle},
    widgets::WidgetFlightPopup,
    windows,
};

// Idle pool size; the scheduler adds threads while fetches hang.
const SYNC_WORKERS: usize = 4;

/// The map window: tiles, markers, popups and the refresh loop.
///
/// Construction performs the first sync immediately and schedules the next
/// ones every `MapConfig::refresh`. The schedule stops when the controller is
/// dropped, i.e. when the window closes.
pub struct MapController {
    tiles: Box<dyn Tiles>,
    map_memory: MapMemory,
    config: MapConfig,
    flight_sync: FlightSync,
    cycles: Receiver<SyncCycle>,
    selection_state: Rc<RefCell<SelectionState>>,
    popup_widget: Option<WidgetFlightPopup>,
    _sync_handle: SyncHandle,
}

impl MapController {
    /// Creates the map view and starts syncing flights from `source`.
    pub fn new(
        egui_ctx: Context,
        config: MapConfig,
        source: Arc<dyn FlightSource>,
        logger: Logger,
    ) -> Result<Self, SchedulerError> {
        install_image_loaders(&egui_ctx);

        let mut map_memory = MapMemory::default();
        if map_memory.set_zoom(config.zoom).is_err() {
            let _ = logger.warn(
                &format!("Zoom level {} is out of range, using default", config.zoom),
                true,
            );
        }

        let repaint_ctx = egui_ctx.clone();
        let (sync_handle, cycles) = SyncScheduler::new(config.refresh, SYNC_WORKERS)
            .start(source, move || repaint_ctx.request_repaint())?;

        let _ = logger.info(
            &format!(
                "Map centered at ({}, {}), refreshing every {} ms",
                config.center_lat,
                config.center_lon,
                config.refresh.as_millis()
            ),
            Color::Green,
            true,
        );

        Ok(Self {
            tiles: Box::new(HttpTiles::with_options(
                walkers::sources::OpenStreetMap,
                HttpOptions::default(),
                egui_ctx.to_owned(),
            )),
            map_memory,
            config,
            flight_sync: FlightSync::new(logger),
            cycles,
            selection_state: Rc::new(RefCell::new(SelectionState::new())),
            popup_widget: None,
            _sync_handle: sync_handle,
        })
    }

    // Applies every fetch completed since the previous frame, in arrival order.
    fn drain_cycles(&mut self) {
        while let Ok(cycle) = self.cycles.try_recv() {
            self.flight_sync.apply(cycle);
        }
    }

    fn show_popup(&mut self, ctx: &Context) {
        let selected = self.selection_state.borrow().flight.clone();
        let Some(id) = selected else {
            self.popup_widget = None;
            return;
        };
        let Some(marker) = self.flight_sync.registry().get(&id) else {
            self.selection_state.borrow_mut().flight = None;
            return;
        };

        let is_current = self
            .popup_widget
            .as_ref()
            .is_some_and(|widget| widget.selected_flight == id);
        if !is_current {
            self.popup_widget = Some(WidgetFlightPopup::new(id));
        }
        let Some(widget) = self.popup_widget.as_mut() else {
            return;
        };

        if !widget.show(ctx, marker) {
            self.selection_state.borrow_mut().flight = None;
            self.popup_widget = None;
        }
    }
}

impl eframe::App for MapController {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_cycles();

        ctx.request_repaint_after(self.config.refresh);

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let center = Position::from_lat_lon(self.config.center_lat, self.config.center_lon);

                let tiles = self.tiles.as_mut();

                let marker_plugin = plugins::Markers::new(
                    self.flight_sync.registry(),
                    &self.config.icon,
                    self.selection_state.clone(),
                );

                let map = Map::new(Some(tiles), &mut self.map_memory, center)
                    .with_plugin(marker_plugin);

                ui.add(map);

                windows::zoom(ui, &mut self.map_memory);
                windows::attribution(ui);
                windows::status(ui, &self.flight_sync);
            });

        self.show_popup(ctx);
    }
}

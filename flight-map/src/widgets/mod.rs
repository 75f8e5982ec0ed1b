mod flight_popup;
pub use flight_popup::WidgetFlightPopup;

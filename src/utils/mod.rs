mod calendar_window;
pub use calendar_window::CalendarWindow;

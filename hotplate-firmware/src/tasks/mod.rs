//! Embassy async tasks
//!
//! Each task runs independently and communicates through the shared state
//! and the display signals.

pub mod button;
pub mod control;
pub mod display;
pub mod encoder;
pub mod sensor;

pub use button::button_task;
pub use control::{control_task, HotplateController};
pub use display::display_task;
pub use encoder::encoder_task;
pub use sensor::{sensor_task, Thermocouple};

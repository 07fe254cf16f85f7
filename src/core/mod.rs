pub mod clock;
pub mod controller;
pub mod input_adapter;

pub use clock::{Clock, FPS_UPDATE_INTERVAL};
pub use controller::{Button, Controller};
pub use input_adapter::{PointerEvent, WinitController, PIXELS_PER_LINE};

pub mod app;
pub mod audio;
pub mod color;
pub mod crossing;
pub mod error;
pub mod feedback;
pub mod helpers;
pub mod item;
pub mod resolver;
pub mod settings;
pub mod spin;
pub mod synth;
pub mod ui;
pub mod utils;
pub mod widgets;

pub use app::WheelApp;
pub use color::ItemColor;
pub use crossing::SegmentCrossingDetector;
pub use error::SpinError;
pub use item::{Item, ItemList};
pub use resolver::resolve;
pub use spin::{SpinObserver, SpinPhysics, SpinResult, TickEvent, WheelState};
pub use utils::capitalize_first_letter;

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod drawer;
pub mod history;
pub mod input;
pub mod layout;
pub mod panels;
pub mod scheduler;
pub mod session;
pub mod surface;

pub use app::SketchApp;
pub use drawer::Drawer;
pub use history::{History, HistoryStep};
pub use input::{PointerEvent, PointerTracker};
pub use layout::{Layout, Tool};
pub use scheduler::{FrameScheduler, NullScheduler, RepaintScheduler};
pub use session::DrawingSession;
pub use surface::{PixelSurface, RasterSurface, SurfaceError};

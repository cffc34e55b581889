pub mod diagnostics;
pub mod event_bus;
pub mod frame;

pub use diagnostics::*;
pub use event_bus::*;
pub use frame::*;

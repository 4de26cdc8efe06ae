pub mod cv_handlers;
pub mod export_handlers;
pub mod system_handlers;

pub use cv_handlers::*;
pub use export_handlers::*;
pub use system_handlers::*;

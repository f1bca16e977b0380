pub mod config;
pub mod export;
pub mod form;
pub mod logging;

pub use config::FormConfig;
pub use export::{ExportError, ExportReceipt, ExportedLifeEvent, Exporter, FileExporter, StdoutExporter};
pub use form::{FormError, GeneratingFlag, LifeEventForm};

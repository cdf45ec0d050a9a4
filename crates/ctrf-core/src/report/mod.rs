pub mod console;
pub mod json;
pub mod summary;

pub use json::ReportWriter;
pub use summary::Summary;

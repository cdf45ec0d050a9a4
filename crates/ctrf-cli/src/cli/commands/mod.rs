pub mod convert;
pub mod dispatch;

pub use dispatch::dispatch;

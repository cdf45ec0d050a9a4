use clap::{Parser, Subcommand};

pub mod convert;
pub use convert::*;

#[derive(Parser)]
#[command(
    name = "ctrf",
    version,
    about = "Convert a test runner's result tree into a CTRF JSON report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read a serialized result tree and write the CTRF report
    Convert(ConvertArgs),
    Version,
}

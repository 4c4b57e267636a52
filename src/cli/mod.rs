// Command-line interface module

pub mod app;

pub use app::{run, Cli, Command, Outcome};

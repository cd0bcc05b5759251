pub mod cli;
pub mod formats;
pub mod model;
pub mod render;
pub mod runtime;
pub mod slicing;
pub mod view;
pub mod workflow;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}

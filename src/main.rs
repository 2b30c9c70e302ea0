mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod mpris;
mod runtime;
mod ui;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

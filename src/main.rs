mod app;
mod config;
mod library;
mod logging;
mod lyrics;
mod playback;
mod runtime;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

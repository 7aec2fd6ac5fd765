use anyhow::Context;
use std::env;
use std::process;
use weekview::app::App;
use weekview::Config;

fn run() -> anyhow::Result<()> {
    // Optional config file as the only argument
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => Config::load_from_file(path),
        None => Config::default(),
    };

    let mut app = App::new(config).context("Failed to initialize calendar")?;
    app.run().context("Calendar error")?;
    Ok(())
}

fn main() {
    // Initialize logger
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

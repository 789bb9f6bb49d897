use clap::Parser;
use snafu::ErrorCompat;

mod args;
mod review;

fn main() {
    let parsed = args::Args::parse();
    if parsed.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    if let Err(e) = review::run_app(&parsed) {
        eprintln!("An error occurred: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}

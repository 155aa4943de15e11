use grab_core::logging;

mod cli;

fn main() {
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    let cli = cli::parse_args();
    if let Err(err) = cli::run(cli) {
        tracing::error!("grabsum failed: {:#}", err);
        eprintln!("grabsum error: {:#}", err);
        std::process::exit(1);
    }
}

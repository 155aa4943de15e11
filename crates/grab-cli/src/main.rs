use grab_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    let cli = cli::parse_args();
    if let Err(err) = cli::run(cli).await {
        tracing::error!("grab failed: {:#}", err);
        eprintln!("Failed with error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

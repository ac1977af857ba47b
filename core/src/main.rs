use mainchain_pow::cli;
use mainchain_pow::utils::{initialize_logger, verbosity_to_level_filter};
use std::process::exit;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = match cli::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };

    initialize_logger(verbosity_to_level_filter(args.verbose))?;

    let params = cli::get_network_params(&args)?;
    tracing::debug!("Using {} network parameters", params.network);

    if !cli::run(&args.command, &params)? {
        exit(1);
    }

    Ok(())
}

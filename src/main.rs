use pipewright::cli::commands::{CliArgs, Commands};
use pipewright::cli::handlers::{handle_classify, handle_configure, handle_templates};
use pipewright::util::logging::{config_from_env, init_logging, parse_level};
use pipewright::{RunSuffix, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("pipewright v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Configure(configure_args) => {
            let suffix = RunSuffix::generate();
            debug!(suffix = %suffix, "Generated run suffix");
            handle_configure(configure_args, args.quiet, suffix).await
        }
        Commands::Templates(templates_args) => handle_templates(templates_args).await,
        Commands::Classify(classify_args) => handle_classify(classify_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = config_from_env();
    if let Some(level) = &args.log_level {
        config.level = parse_level(level);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    init_logging(config);
}

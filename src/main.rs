/*!
 * Command-line interface for idrive
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use idrive::app::App;
use idrive::config::{Args, Config};
use idrive::error::Result;
use idrive::logging;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "idrive", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args(args)?;
    config.validate()?;

    App::new(config)?.run()
}

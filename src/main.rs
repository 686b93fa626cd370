use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {

    // 1. Parse commandline arguments
    let cli = meshcouple::args::MeshcoupleCli::parse();
    meshcouple::logger::init_logging(cli.log_level.as_deref());

    // 2. Run the subcommand
    if let Err(err) = meshcouple::run(cli) {
        println!("PROCESS ERROR!");
        println!("{}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

mod commands;
mod terminal;

use commands::{CommandLine, Commands, fetch, lookup};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner();

    match commands.into_command() {
        Commands::Lookup(args) => {
            print::header("getting ready for lookup");
            lookup::lookup(args).await
        }
        Commands::Fetch(args) => {
            print::header("fetching vendor registries");
            fetch::fetch(args).await
        }
    }
}

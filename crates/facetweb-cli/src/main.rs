use clap::Parser;
use facetweb_cli::{CliArgs, FacetwebCli};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let result = match FacetwebCli::from_args("facetweb", &args) {
        Ok(cli) => cli.run(args).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use tracing::error;

use sipcalc::api::{Calculation, run_calculation, run_http_server};

#[derive(Parser, Debug)]
#[command(
    name = "sipcalc",
    about = "Lumpsum, SIP, step-up SIP and goal-seek investment projections"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the projection JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    #[command(flatten)]
    Calculate(Calculation),
}

#[tokio::main]
async fn main() {
    sipcalc::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Calculate(calculation) => {
            let output = match run_calculation(calculation) {
                Ok(output) => output,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

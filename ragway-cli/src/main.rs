use clap::Parser;
use ragway_cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(e) = ragway_telemetry::init_with_format("ragway", args.log_format) {
        eprintln!("failed to initialize logging: {e}");
    }

    ragway_cli::run(args).await
}

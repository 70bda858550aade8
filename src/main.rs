use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = opsquery::cli::Cli::parse();
    if let Err(e) = opsquery::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

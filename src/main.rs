// NetCon - Interactive TCP console
use clap::Parser;
use netcon::cli::{execute_command, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    execute_command(args).await
}

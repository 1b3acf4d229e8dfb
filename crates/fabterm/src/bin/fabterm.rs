use clap::Parser;
use fabterm::{app, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    let result = app::run(config).await;

    // Flush before any error is printed on the restored screen
    use std::io::{self, Write};
    let _ = io::stderr().flush();
    let _ = io::stdout().flush();

    result
}

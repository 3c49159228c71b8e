// src/main.rs

use workerctl::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("workerctl error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    // `stop` blocks, so the driver runs on the blocking pool.
    tokio::task::spawn_blocking(move || run(args)).await?
}

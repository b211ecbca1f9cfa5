// src/main.rs

use tabledump::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("tabledump error: {err}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let path = run(args).await?;
    if let Some(path) = path {
        println!("{}", path.display());
    }
    Ok(())
}

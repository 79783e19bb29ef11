// src/main.rs

use blip::{cli, load_settings, logging, watch_and_run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("blip error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = load_settings(&args)?;
    logging::init_logging(args.log_level, cfg.verbose)?;
    watch_and_run(cfg).await?;
    Ok(())
}

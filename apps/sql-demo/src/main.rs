use anyhow::Context;
use fluree_sql_demo::{load_config, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_tracing().context("Failed to initialize tracing")?;

    let config = load_config()?;
    let mut stdout = std::io::stdout().lock();

    run(&config, &mut stdout).await
}

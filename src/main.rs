use anyhow::Result;
use clap::Parser;

mod cache;
mod cli;
mod config;
mod i18n;
mod llm;
mod outlet;
mod researcher;
mod search;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let (config, seed) = args.into_config_and_seed();

    let outcome = researcher::launch(&config, seed).await?;

    // 将最终画像输出给调用方
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

use std::env;

use net_ping::config::AppConfig;
use net_ping::{PingExecutor, PingOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load();
    let mut args = env::args().skip(1);
    let target = args.next().unwrap_or_else(|| config.target.clone());
    let count = args.next().and_then(|arg| arg.parse::<u32>().ok());

    let mut executor = PingExecutor::new()?;
    let mut options = config.options.clone();
    if let Some(count) = count {
        options = PingOptions { count: Some(count), ..options };
    }
    executor.set_options(options);

    let report = executor.ping(&target).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

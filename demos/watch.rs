use std::thread;
use std::time::Duration;

use dragon_config::{AppContext, ConfigOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), dragon_config::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ctx = AppContext::builder()
        .with_options(
            ConfigOptions::new()
                .with_file("tests/fixtures/.env.test")
                .with_file("tests/fixtures/test.yaml")
                .with_value("app.name", "watch-demo")
                .watch(true),
        )
        .build()?;

    let config = ctx.config();
    println!("app: {}", config.get_string("app.name"));
    println!("server: {}:{}", config.get_string("server.host"), config.get_int("server.port"));
    println!("keys: {}", config.all_keys().join(", "));

    // Edit tests/fixtures/test.yaml while this runs to see reloads.
    for _ in 0..30 {
        thread::sleep(Duration::from_secs(1));
        println!("server.port = {}", config.get_int("server.port"));
    }

    Ok(())
}

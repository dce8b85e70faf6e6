//! Example demonstrating a parser with its own key and lookup source

use envbind::{EnvBind, Parser};
use std::collections::HashMap;

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Read by the default parser from the environment,
    // and by the parser below from its own source
    #[bind(env = "LOG_LEVEL", settings = "log.level")]
    pub log_level: u8,

    #[bind(settings = "log.format,optional")]
    pub log_format: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let settings = HashMap::from([("log.level", "3"), ("log.format", "json")]);
    let parser = Parser::new("settings", |name: &str| {
        settings.get(name).map(|value| value.to_string())
    });

    let config: Config = parser.load()?;

    println!("Configuration loaded:");
    println!("  Log Level: {}", config.log_level);
    println!("  Log Format: {:?}", config.log_format);

    Ok(())
}

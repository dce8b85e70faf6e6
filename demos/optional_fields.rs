//! Example demonstrating Option<T> for optional fields

use envbind::EnvBind;

#[derive(Debug, Default, EnvBind)]
struct Config {
    #[bind(env = "APP_NAME")]
    pub app_name: String,

    // None unless the variable is set
    #[bind(env = "API_KEY,optional")]
    pub api_key: Option<String>,

    #[bind(env = "PORT,optional")]
    pub port: Option<u16>,

    #[bind(env = "DEBUG,optional")]
    pub debug: Option<bool>,
}

fn main() -> anyhow::Result<()> {
    // Set only some environment variables
    std::env::set_var("APP_NAME", "my-application");
    std::env::set_var("PORT", "8080");
    // API_KEY, DEBUG not set

    let config: Config = envbind::from_env()?;

    println!("Configuration:");
    println!("  App Name: {}", config.app_name);
    println!("  API Key: {:?}", config.api_key); // None
    println!("  Port: {:?}", config.port); // Some(8080)
    println!("  Debug: {:?}", config.debug); // None

    Ok(())
}

//! Basic usage example

use envbind::EnvBind;

#[derive(Debug, EnvBind)]
struct Config {
    // Required: loading fails if DATABASE_URL is not set
    #[bind(env = "DATABASE_URL")]
    pub database_url: String,

    // Optional: keeps the value below unless SERVER_ADDR is set
    #[bind(env = "SERVER_ADDR,optional")]
    pub server_addr: String,

    #[bind(env = "MAX_CONNECTIONS,optional")]
    pub max_connections: u32,

    #[bind(env = "DEBUG_MODE,optional")]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");

    // Defaults are whatever the struct holds before loading
    let mut config = Config {
        database_url: String::new(),
        server_addr: "127.0.0.1:8080".to_string(),
        max_connections: 10,
        debug_mode: false,
    };
    envbind::get(&mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}

//! Example demonstrating nested configuration records

use envbind::EnvBind;

#[derive(Debug, Default, EnvBind)]
struct DatabaseConfig {
    #[bind(env = "DB_HOST")]
    pub host: String,

    #[bind(env = "DB_PORT,optional")]
    pub port: u16,
}

#[derive(Debug, Default, EnvBind)]
struct CacheConfig {
    #[bind(env = "CACHE_URL")]
    pub url: String,
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    #[bind(env = "APP_NAME")]
    pub app_name: String,

    #[bind(nested)]
    pub database: DatabaseConfig,

    // Allocated while loading, then filled like any other record
    #[bind(nested)]
    pub cache: Option<CacheConfig>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_NAME", "my-application");
    std::env::set_var("DB_HOST", "db.internal");
    std::env::set_var("CACHE_URL", "redis://localhost");

    let mut config = Config::default();
    config.database.port = 5432;
    envbind::get(&mut config)?;

    println!("Configuration loaded:");
    println!("  App Name: {}", config.app_name);
    println!("  Database: {}:{}", config.database.host, config.database.port);
    println!("  Cache: {:?}", config.cache.map(|c| c.url));

    Ok(())
}

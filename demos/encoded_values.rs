//! Example demonstrating base64 and JSON encoded values

use envbind::EnvBind;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Binary secret shipped as base64
    #[bind(env = "SIGNING_KEY,base64")]
    pub signing_key: Vec<u8>,

    #[bind(env = "TAGS,json")]
    pub tags: Vec<String>,

    #[bind(env = "ENVIRONMENT_VARS,json")]
    pub environment_vars: HashMap<String, String>,

    #[bind(env = "DATABASE,json")]
    pub database: DatabaseConfig,

    // base64 is decoded first, then JSON, whatever order they are written in
    #[bind(env = "REPLICAS,json,base64")]
    pub replicas: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("SIGNING_KEY", "c2VjcmV0LWtleQ==");
    std::env::set_var("TAGS", r#"["production","api","v2"]"#);
    std::env::set_var(
        "ENVIRONMENT_VARS",
        r#"{"LOG_LEVEL":"debug","TIMEOUT":"30"}"#,
    );
    std::env::set_var(
        "DATABASE",
        r#"{"host":"localhost","port":5432,"username":"admin"}"#,
    );
    // ["db-1","db-2"]
    std::env::set_var("REPLICAS", "WyJkYi0xIiwiZGItMiJd");

    let config: Config = envbind::from_env()?;

    println!("Configuration loaded:");
    println!("  Signing Key: {} bytes", config.signing_key.len());
    println!("  Tags: {:?}", config.tags);
    println!("  Environment Variables: {:?}", config.environment_vars);
    println!(
        "  Database: {}:{} (user: {})",
        config.database.host, config.database.port, config.database.username
    );
    println!("  Replicas: {:?}", config.replicas);

    Ok(())
}

use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub secret: String,
    pub database_url: String,
    pub listen_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("SECRET").map_err(|_| "SECRET must be set".to_string())?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        Ok(ServerConfig {
            secret,
            database_url,
            listen_addr,
        })
    }
}

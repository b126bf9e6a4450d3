use std::env;

pub struct Config {
    /// Postgres connection string. When unset the server falls back to the
    /// in-memory stores, which lose all data on restart.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// Secret used to sign and verify bearer tokens. Required: without it no
    /// previously issued token could ever be verified, so startup aborts.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("TOKEN_TTL_SECS must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

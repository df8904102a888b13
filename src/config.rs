use std::env;

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub opening_balance: f64,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "magnum-dev-secret-change-me".to_string());

        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".into());
        }

        let access_ttl_minutes = env::var("ACCESS_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;
        let refresh_ttl_days = env::var("REFRESH_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()?;

        let opening_balance = env::var("OPENING_BALANCE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()?;

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Config {
            server_host,
            server_port,
            jwt_secret,
            access_ttl_minutes,
            refresh_ttl_days,
            opening_balance,
            seed_demo_data,
        })
    }

    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days)
    }
}

impl Default for Config {
    /// Defaults used by tests: loopback host, random port left to the caller.
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            jwt_secret: "magnum-dev-secret-change-me".to_string(),
            access_ttl_minutes: 60,
            refresh_ttl_days: 7,
            opening_balance: 1000.0,
            seed_demo_data: false,
        }
    }
}

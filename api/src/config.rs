use std::{env, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_url: String,
    pub db_name: String,
    pub session_secret: String,
    pub session_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub s3_key: String,
    pub s3_secret: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub login_attempts_per_minute: u32,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    pub public_dir: String,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| format!("{} must be set", key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let port = or_default("PORT", "8080")
            .parse()
            .map_err(|_| "Invalid PORT")?;
        let session_ttl_secs = or_default("SESSION_TTL_SECS", "60")
            .parse()
            .map_err(|_| "Invalid SESSION_TTL_SECS")?;
        let bcrypt_cost = or_default("BCRYPT_COST", "10")
            .parse()
            .map_err(|_| "Invalid BCRYPT_COST")?;
        let login_attempts_per_minute = or_default("LOGIN_ATTEMPTS_PER_MINUTE", "10")
            .parse()
            .map_err(|_| "Invalid LOGIN_ATTEMPTS_PER_MINUTE")?;
        let max_upload_bytes = or_default("MAX_UPLOAD_BYTES", "10485760")
            .parse()
            .map_err(|_| "Invalid MAX_UPLOAD_BYTES")?;
        let request_timeout_secs = or_default("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|_| "Invalid REQUEST_TIMEOUT_SECS")?;
        let max_concurrent_requests = or_default("MAX_CONCURRENT_REQUESTS", "256")
            .parse()
            .map_err(|_| "Invalid MAX_CONCURRENT_REQUESTS")?;

        if session_ttl_secs == 0 {
            return Err("SESSION_TTL_SECS must be greater than zero".into());
        }
        if !(4..=31).contains(&bcrypt_cost) {
            return Err("BCRYPT_COST must be between 4 and 31".into());
        }
        if login_attempts_per_minute == 0 {
            return Err("LOGIN_ATTEMPTS_PER_MINUTE must be greater than zero".into());
        }

        Ok(Config {
            host: or_default("HOST", "0.0.0.0"),
            port,
            db_url: required("DB_URL")?,
            db_name: or_default("DB_NAME", "forum"),
            session_secret: required("SECRET")?,
            session_ttl_secs,
            bcrypt_cost,
            s3_key: required("S3_KEY")?,
            s3_secret: required("S3_SECRET")?,
            s3_bucket: or_default("S3_BUCKET", "taste-hub"),
            s3_region: or_default("S3_REGION", "ap-northeast-2"),
            login_attempts_per_minute,
            max_upload_bytes,
            request_timeout_secs,
            max_concurrent_requests,
            public_dir: or_default("PUBLIC_DIR", "public"),
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DB_URL", "mongodb://localhost:27017"),
        ("SECRET", "keyboard cat"),
        ("S3_KEY", "AKIA"),
        ("S3_SECRET", "shh"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_name, "forum");
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.s3_bucket, "taste-hub");
        assert_eq!(config.s3_region, "ap-northeast-2");
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let vars: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != "SECRET").collect();
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, "SECRET must be set");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert_eq!(Config::from_lookup(lookup(&vars)).unwrap_err(), "Invalid PORT");
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_TTL_SECS", "0"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }
}

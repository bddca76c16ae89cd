//! Configuration validation tests.
//!
//! These exercise the public config types without touching process
//! environment variables.

use sharelink::config::{Config, CorsConfig, DatabaseConfig, LinkConfig, ServerConfig, StoreBackend};

fn memory_config() -> Config {
    Config {
        server: ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        },
        database: DatabaseConfig {
            backend: StoreBackend::Memory,
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
        },
        links: LinkConfig {
            base_url: "https://sho.rt".to_string(),
            short_code_max_attempts: 10,
            fraud_check_delay_ms: 100,
        },
        cors: CorsConfig::parse("*"),
    }
}

mod store_backend_tests {
    use super::*;

    #[test]
    fn test_parse_backends() {
        assert_eq!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("PostgreSQL".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!(" memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for backend in [StoreBackend::Postgres, StoreBackend::Memory] {
            assert_eq!(backend.to_string().parse::<StoreBackend>(), Ok(backend));
        }
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_memory_backend_needs_no_url() {
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_zero_acquire_timeout_is_rejected() {
        let mut config = memory_config();
        config.database.acquire_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_attempts_bounds() {
        let mut config = memory_config();
        config.links.short_code_max_attempts = 100;
        assert!(config.validate().is_ok());

        config.links.short_code_max_attempts = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fraud_check_delay() {
        let config = memory_config();
        assert_eq!(config.links.fraud_check_delay().as_millis(), 100);
    }
}

mod cors_tests {
    use super::*;

    #[test]
    fn test_wildcard_cors() {
        assert!(CorsConfig::parse("*").allows_any());
    }

    #[test]
    fn test_cors_origins_parsing() {
        let cors = CorsConfig::parse("http://localhost:3000, https://example.com,");
        assert_eq!(
            cors.allowed_origins,
            vec!["http://localhost:3000", "https://example.com"]
        );
        assert!(!cors.allows_any());
    }
}

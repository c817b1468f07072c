//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CAREPORTAL_*` environment variables and an
//! optional configuration file, in OrthoConfig's usual precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// Listener, storage and session lifetime settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAREPORTAL")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. Users live in memory when unset.
    pub database_url: Option<String>,
    /// Session cookie lifetime.
    #[ortho_config(default = 120)]
    pub session_ttl_minutes: i64,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port,
        )
    }

    /// Non-positive values fall back to the default lifetime.
    pub fn session_ttl_minutes(&self) -> i64 {
        if self.session_ttl_minutes > 0 {
            self.session_ttl_minutes
        } else {
            DEFAULT_SESSION_TTL_MINUTES
        }
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("careportal")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("CAREPORTAL_HOST", None::<String>),
            ("CAREPORTAL_PORT", None::<String>),
            ("CAREPORTAL_DATABASE_URL", None::<String>),
            ("CAREPORTAL_SESSION_TTL_MINUTES", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.session_ttl_minutes(), DEFAULT_SESSION_TTL_MINUTES);
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CAREPORTAL_HOST", Some("127.0.0.1".to_owned())),
            ("CAREPORTAL_PORT", Some("9090".to_owned())),
            (
                "CAREPORTAL_DATABASE_URL",
                Some("postgres://care@localhost/care".to_owned()),
            ),
            ("CAREPORTAL_SESSION_TTL_MINUTES", Some("30".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert_eq!(
            settings.database_url(),
            Some("postgres://care@localhost/care")
        );
        assert_eq!(settings.session_ttl_minutes(), 30);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn invalid_ttl_uses_default(#[case] ttl: i64) {
        let settings = ServerSettings {
            host: None,
            port: 8080,
            database_url: Some("   ".to_owned()),
            session_ttl_minutes: ttl,
        };
        assert_eq!(settings.session_ttl_minutes(), DEFAULT_SESSION_TTL_MINUTES);
        assert!(settings.database_url().is_none());
    }
}

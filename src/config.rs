use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::notify::SmtpConfig;

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars (never hardcoded). A `.env` file is loaded
/// automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listen address for the HTTP service (`BIND_ADDR`, default `127.0.0.1:8080`).
    pub bind: SocketAddr,
    /// SMTP relay settings. Absent unless `SMTP_HOST` is set; the service
    /// then still ranks, it just cannot email results.
    pub smtp: Option<SmtpConfig>,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bind = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind = bind
            .parse()
            .with_context(|| format!("invalid BIND_ADDR {bind:?}"))?;
        Ok(Self {
            bind,
            smtp: smtp_from_env()?,
        })
    }
}

/// `SMTP_HOST` switches email on; the remaining `SMTP_*` vars are then
/// required. `SMTP_PORT` overrides the default STARTTLS port.
fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let Ok(host) = env::var("SMTP_HOST") else {
        return Ok(None);
    };
    let port = match env::var("SMTP_PORT") {
        Ok(p) => Some(
            p.parse::<u16>()
                .with_context(|| format!("invalid SMTP_PORT {p:?}"))?,
        ),
        Err(_) => None,
    };
    Ok(Some(SmtpConfig {
        host,
        port,
        user: env::var("SMTP_USER").context("SMTP_USER missing")?,
        pass: env::var("SMTP_PASS").context("SMTP_PASS missing")?,
        from: env::var("RESULT_EMAIL_FROM").context("RESULT_EMAIL_FROM missing")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "BIND_ADDR",
            "SMTP_HOST",
            "SMTP_PORT",
            "SMTP_USER",
            "SMTP_PASS",
            "RESULT_EMAIL_FROM",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        clear_env();
        let cfg = ServiceConfig::from_env().unwrap();
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:8080");
        assert!(cfg.smtp.is_none());
    }

    #[test]
    #[serial]
    fn smtp_host_alone_is_not_enough() {
        clear_env();
        env::set_var("SMTP_HOST", "smtp.example.com");
        let err = ServiceConfig::from_env().unwrap_err();
        assert!(format!("{err:#}").contains("SMTP_USER"));
        clear_env();
    }

    #[test]
    #[serial]
    fn full_smtp_config_parses() {
        clear_env();
        env::set_var("SMTP_HOST", "smtp.example.com");
        env::set_var("SMTP_PORT", "2525");
        env::set_var("SMTP_USER", "mailer");
        env::set_var("SMTP_PASS", "hunter2");
        env::set_var("RESULT_EMAIL_FROM", "Topsis <noreply@example.com>");
        let cfg = ServiceConfig::from_env().unwrap();
        let smtp = cfg.smtp.expect("smtp should be configured");
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, Some(2525));
        assert_eq!(smtp.user, "mailer");
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unparseable_bind_addr() {
        clear_env();
        env::set_var("BIND_ADDR", "not-an-addr");
        assert!(ServiceConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unparseable_smtp_port() {
        clear_env();
        env::set_var("SMTP_HOST", "smtp.example.com");
        env::set_var("SMTP_PORT", "lots");
        env::set_var("SMTP_USER", "mailer");
        env::set_var("SMTP_PASS", "hunter2");
        env::set_var("RESULT_EMAIL_FROM", "noreply@example.com");
        let err = ServiceConfig::from_env().unwrap_err();
        assert!(format!("{err:#}").contains("SMTP_PORT"));
        clear_env();
    }
}

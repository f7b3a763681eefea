use crate::outbound::graphql::{DEFAULT_ENDPOINT, TransportConfig};
use figment2::{
    Figment,
    providers::{Env, Format, Toml},
};
use railyard_shared::ProjectId;
use reqwest::Url;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Figment(#[from] figment2::Error),
    #[error("invalid graphql api url `{url}`: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub graphql_api_url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub api_token: Option<String>,
    #[serde(default, deserialize_with = "project_id")]
    pub project_id: Option<ProjectId>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_port() -> u16 {
    3033
}

/// Environment values that look numeric reach us as numbers; identifiers and
/// tokens are taken verbatim either way.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct Verbatim;

    impl<'de> Visitor<'de> for Verbatim {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(Verbatim)
}

fn project_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ProjectId>, D::Error> {
    Ok(string_or_number(deserializer)?.map(ProjectId::new))
}

impl Config {
    pub fn transport(&self) -> Result<TransportConfig, ConfigError> {
        let endpoint =
            Url::parse(&self.graphql_api_url).map_err(|source| ConfigError::InvalidEndpoint {
                url: self.graphql_api_url.clone(),
                source,
            })?;
        Ok(TransportConfig {
            endpoint,
            token: self.api_token.clone().filter(|t| !t.is_empty()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Reads the optional TOML file, then `RAILYARD_*` environment variables on top.
pub fn load_config(config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }
    let config = figment.merge(Env::prefixed("RAILYARD_")).extract()?;
    Ok(config)
}

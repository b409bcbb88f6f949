//! Reading declaration documents into [`File`] values.

use std::sync::Arc;

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Format as _, Json},
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::{ModelError, ModelResult};

#[cfg(feature = "yaml")]
use super::yaml::SaphyrYaml;
use super::{Config, File, Service};

const MIXED_DOCUMENT: &str =
    "must contain either service definition or services list, but not both";

/// Supported declaration document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON documents (`.json`).
    Json,
    /// TOML documents (`.toml`).
    Toml,
    /// YAML documents (`.yaml`, `.yml`).
    Yaml,
}

impl Format {
    /// Select a format from a file extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let ext = path.extension()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn figment(self, origin: &Utf8Path, data: &str) -> Result<Figment, figment::Error> {
        match self {
            Self::Json => Ok(Figment::from(Json::string(data))),
            Self::Toml => {
                #[cfg(feature = "toml")]
                {
                    Ok(Figment::from(figment::providers::Toml::string(data)))
                }
                #[cfg(not(feature = "toml"))]
                {
                    let _ = (origin, data);
                    Err(figment::Error::from(
                        "toml feature disabled: enable the 'toml' feature to support this file format",
                    ))
                }
            }
            Self::Yaml => {
                #[cfg(feature = "yaml")]
                {
                    Ok(Figment::from(SaphyrYaml::string(
                        origin.to_owned(),
                        data.to_owned(),
                    )))
                }
                #[cfg(not(feature = "yaml"))]
                {
                    let _ = (origin, data);
                    Err(figment::Error::from(
                        "yaml feature disabled: enable the 'yaml' feature to support this file format",
                    ))
                }
            }
        }
    }
}

/// Decode a parsed document, enforcing the single-service versus
/// `services`-list shape.
fn decode(figment: &Figment) -> Result<File, figment::Error> {
    let value: JsonValue = figment.extract()?;
    let has_services = value.get("services").is_some();
    let has_other = value
        .as_object()
        .is_some_and(|map| map.keys().any(|k| k != "services"));
    let shape_error = |e: serde_json::Error| figment::Error::from(e.to_string());
    if has_services {
        if has_other {
            return Err(figment::Error::from(MIXED_DOCUMENT));
        }
        let config = Config::deserialize(value).map_err(shape_error)?;
        Ok(File::Services(config.services))
    } else {
        let service = Service::deserialize(value).map_err(shape_error)?;
        Ok(File::Service(Box::new(service)))
    }
}

/// Parse declaration text in the given format.
///
/// # Examples
///
/// ```
/// use apimodel::config::{Format, parse_config_str};
///
/// let file = parse_config_str(Format::Json, r#"{"name": "svc"}"#)?;
/// assert_eq!(file.into_services().len(), 1);
/// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
/// ```
///
/// # Errors
///
/// Returns [`ModelError::Gathering`] when the text does not parse or does
/// not match the declaration shape.
pub fn parse_config_str(format: Format, text: &str) -> ModelResult<File> {
    format
        .figment(Utf8Path::new("<string>"), text)
        .and_then(|figment| decode(&figment))
        .map_err(|e| Arc::new(ModelError::gathering(e)))
}

/// Load one declaration file, selecting the parser from its extension.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedFormat`] for unknown extensions and
/// [`ModelError::File`] when reading or parsing fails.
pub fn load_config_file(path: &Utf8Path) -> ModelResult<File> {
    let Some(format) = Format::from_path(path) else {
        return Err(Arc::new(ModelError::UnsupportedFormat {
            path: path.to_owned(),
        }));
    };
    let data = std::fs::read_to_string(path).map_err(|e| Arc::new(ModelError::file(path, e)))?;
    let file = format
        .figment(path, &data)
        .and_then(|figment| decode(&figment))
        .map_err(|e| Arc::new(ModelError::file(path, e)))?;
    tracing::debug!(%path, ?format, "loaded declaration file");
    Ok(file)
}

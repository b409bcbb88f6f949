//! YAML provider backed by `serde-saphyr`.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde_saphyr::Options;

/// Figment provider that parses in-memory YAML declarations.
///
/// Booleans are strict: only `true` and `false` are accepted, so `yes`,
/// `on` and friends stay strings.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    origin: Utf8PathBuf,
    contents: String,
}

impl SaphyrYaml {
    /// Provider over `contents`, reporting `origin` in metadata and errors.
    #[must_use]
    pub fn string(origin: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            contents: contents.into(),
        }
    }

    fn parse_value(contents: &str) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.origin.as_std_path())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let value = Self::parse_value(&self.contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.origin
            )))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}

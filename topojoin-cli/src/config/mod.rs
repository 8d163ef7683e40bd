//! Configuration de la construction (fichier JSON, options CLI, environnement)

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use topojoin::{Options, PropertyFilter};

/// Résolution par défaut de la grille de quantification
pub const DEFAULT_QUANTIZATION: u32 = 10_000;

/// Variable d'environnement (ou `.env`) remplaçant la résolution par défaut
pub const QUANTIZATION_ENV: &str = "TOPOJOIN_QUANTIZATION";

/// Configuration principale
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Cellules par axe (0 = coordonnées brutes)
    pub quantization: Option<u32>,

    /// Propriétés conservées, `cible=source` ou `nom`
    pub properties: Vec<PropertyMapping>,

    /// Conserver aussi les propriétés dont le nom correspond à ce motif
    pub property_pattern: Option<String>,
}

/// Mapping d'une propriété
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyMapping {
    /// Nom de la propriété dans le GeoJSON
    pub source: String,

    /// Nom de la propriété dans la topologie
    pub target: String,
}

impl FromStr for PropertyMapping {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (target, source) = match s.split_once('=') {
            Some((target, source)) => (target.trim(), source.trim()),
            None => (s.trim(), s.trim()),
        };
        if target.is_empty() || source.is_empty() {
            return Err(format!("Invalid property mapping: '{s}' (expected target=source or name)"));
        }
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

impl TryFrom<String> for PropertyMapping {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PropertyMapping> for String {
    fn from(mapping: PropertyMapping) -> Self {
        mapping.to_string()
    }
}

impl fmt::Display for PropertyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source == self.target {
            write!(f, "{}", self.source)
        } else {
            write!(f, "{}={}", self.target, self.source)
        }
    }
}

/// Découpe une liste `-p name,code=CODE_INSEE`
pub fn parse_property_list(list: &str) -> Result<Vec<PropertyMapping>> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| item.parse::<PropertyMapping>().map_err(anyhow::Error::msg))
        .collect()
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Résolution effective: CLI, puis fichier, puis environnement, puis défaut
    pub fn resolve_quantization(&self, cli: Option<u32>) -> Result<u32> {
        if let Some(q) = cli.or(self.quantization) {
            return Ok(q);
        }
        match std::env::var(QUANTIZATION_ENV) {
            Ok(value) => value
                .trim()
                .parse()
                .context(format!("Invalid {QUANTIZATION_ENV}: {value}")),
            Err(_) => Ok(DEFAULT_QUANTIZATION),
        }
    }

    /// Filtre de propriétés; `None` si aucune propriété n'est demandée
    pub fn property_filter(&self) -> Result<Option<PropertyFilter>> {
        if self.properties.is_empty() && self.property_pattern.is_none() {
            return Ok(None);
        }

        // La dernière déclaration d'une source l'emporte
        let renames: HashMap<String, String> = self
            .properties
            .iter()
            .map(|m| (m.source.clone(), m.target.clone()))
            .collect();

        let pattern = self
            .property_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid property pattern")?;

        Ok(Some(PropertyFilter::from_fn(move |key| {
            if let Some(target) = renames.get(key) {
                return Some(target.clone());
            }
            pattern
                .as_ref()
                .filter(|re| re.is_match(key))
                .map(|_| key.to_string())
        })))
    }

    /// Options de la bibliothèque
    pub fn to_options(&self, cli_quantization: Option<u32>) -> Result<Options> {
        let mut options = Options::new().quantization(self.resolve_quantization(cli_quantization)?);
        if let Some(filter) = self.property_filter()? {
            options = options.property_filter(filter);
        }
        Ok(options)
    }
}

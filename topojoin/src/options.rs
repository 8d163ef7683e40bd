//! Options de construction et filtre de propriétés

use std::fmt;
use std::sync::Arc;

use crate::error::FilterError;
use crate::TopologyError;

type FilterFn = dyn Fn(&str) -> Result<Option<String>, FilterError> + Send + Sync;

/// Filtre appliqué à chaque clé de propriété d'une Feature.
///
/// `Ok(None)` supprime la clé, `Ok(Some(nom))` la conserve sous `nom`.
/// Une erreur interrompt la normalisation et remonte telle quelle.
#[derive(Clone)]
pub struct PropertyFilter(Arc<FilterFn>);

impl PropertyFilter {
    /// Filtre faillible
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>, FilterError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Filtre infaillible
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(move |key| Ok(f(key)))
    }

    /// Conserve toutes les propriétés sous leur nom d'origine
    pub fn keep_all() -> Self {
        Self::from_fn(|key| Some(key.to_string()))
    }

    /// Conserve uniquement les clés listées
    pub fn keep<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        Self::from_fn(move |key| keys.iter().any(|k| k == key).then(|| key.to_string()))
    }

    pub fn apply(&self, key: &str) -> Result<Option<String>, FilterError> {
        (self.0)(key)
    }
}

impl fmt::Debug for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropertyFilter(..)")
    }
}

/// Options de [`crate::topology`]
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Nombre de cellules de la grille par axe (0 = coordonnées brutes, sans delta)
    pub quantization: u32,

    /// Filtre de propriétés (absent = toutes les propriétés sont supprimées)
    pub property_filter: Option<PropertyFilter>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantization(mut self, quantization: u32) -> Self {
        self.quantization = quantization;
        self
    }

    pub fn property_filter(mut self, filter: PropertyFilter) -> Self {
        self.property_filter = Some(filter);
        self
    }

    /// Vérifie la cohérence des options
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.quantization == 1 {
            return Err(TopologyError::Config(
                "quantization must be 0 (disabled) or at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

//! Types d'erreurs pour le crate topojoin

use thiserror::Error;

/// Erreur renvoyée par un filtre de propriétés
pub type FilterError = Box<dyn std::error::Error + Send + Sync>;

/// Erreurs pouvant survenir lors de la construction d'une topologie
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Géométrie d'entrée invalide (type inconnu, positions mal formées, valeurs non finies)
    #[error("Invalid input for object {object}: {reason}")]
    Input { object: String, reason: String },

    /// Le filtre de propriétés a échoué
    #[error("Property filter failed on key {key}: {source}")]
    Filter {
        key: String,
        #[source]
        source: FilterError,
    },

    /// Options invalides
    #[error("Invalid options: {0}")]
    Config(String),
}

impl TopologyError {
    /// Crée une erreur d'entrée avec contexte
    pub fn input(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Input {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de filtre pour une clé donnée
    pub fn filter(key: impl Into<String>, source: FilterError) -> Self {
        Self::Filter {
            key: key.into(),
            source,
        }
    }
}

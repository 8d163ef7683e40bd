//! Définition et implémentation de la commande de construction

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crate::config::{parse_property_list, Config};
use crate::input::{load_inputs, InputFile};
use crate::report::BuildReport;

/// Arguments de construction d'une topologie
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// GeoJSON input files (one object per file, named after the file stem)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (stdout when absent)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Grid cells per axis; 0 disables quantization and delta encoding
    /// (default: env TOPOJOIN_QUANTIZATION / 10000)
    #[arg(short = 'q', long)]
    pub quantization: Option<u32>,

    /// Properties to keep, comma-separated `target=source` or `name`
    #[arg(short, long)]
    pub properties: Option<String>,

    /// Also keep properties whose name matches this regex
    #[arg(long)]
    pub property_pattern: Option<String>,

    /// JSON config file (quantization, properties, property_pattern)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write a JSON build report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl BuildArgs {
    /// Fichier de configuration complété par les options CLI
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(list) = &self.properties {
            config.properties.extend(parse_property_list(list)?);
        }
        if let Some(pattern) = &self.property_pattern {
            config.property_pattern = Some(pattern.clone());
        }
        Ok(config)
    }
}

/// Exécute la construction; renvoie le rapport
pub fn cmd_build(args: &BuildArgs, quiet: bool) -> Result<BuildReport> {
    let start = Instant::now();

    let config = args.resolve_config()?;
    let options = config.to_options(args.quantization)?;

    info!(
        inputs = args.inputs.len(),
        quantization = options.quantization,
        properties = config.properties.len(),
        "Starting build"
    );

    // Lecture parallèle des fichiers; les documents sont déplacés vers le
    // constructeur, seules les statistiques restent pour le rapport
    let (inputs, objects): (Vec<_>, Vec<_>) = load_inputs(&args.inputs)?
        .into_iter()
        .map(InputFile::into_parts)
        .unzip();

    let topology = topojoin::topology(objects, &options).context("Failed to build topology")?;
    if topology.arcs.is_empty() {
        warn!("Topology has no arcs");
    }

    // Écriture
    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create {}", path.display()))?;
            write_topology(BufWriter::new(file), &topology, args.pretty)
                .with_context(|| format!("Cannot write {}", path.display()))?;
        }
        None => write_topology(io::stdout().lock(), &topology, args.pretty)
            .context("Cannot write topology to stdout")?,
    }

    let mut report = BuildReport::new(&inputs, &topology, options.quantization);
    report.set_duration(start.elapsed());
    info!(summary = %report.summary(), "Build finished");

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
    }

    if !quiet {
        // Le rapport ne doit pas se mêler au JSON écrit sur stdout
        if args.out.is_some() {
            report.display(&mut io::stdout().lock())?;
        } else {
            report.display(&mut io::stderr().lock())?;
        }
    }

    Ok(report)
}

fn write_topology<W: Write>(mut writer: W, topology: &topojoin::Topology, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, topology)?;
    } else {
        serde_json::to_writer(&mut writer, topology)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(inputs: &[&str]) -> BuildArgs {
        BuildArgs {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            out: None,
            quantization: None,
            properties: None,
            property_pattern: None,
            config: None,
            pretty: false,
            report: None,
        }
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let mut args = args(&["a.geojson"]);
        args.properties = Some("nom,code=CODE_INSEE".to_string());
        args.property_pattern = Some("^pop".to_string());

        let config = args.resolve_config().unwrap();
        assert_eq!(config.properties.len(), 2);
        assert_eq!(config.property_pattern.as_deref(), Some("^pop"));
    }

    #[test]
    fn test_missing_config_file() {
        let mut args = args(&["a.geojson"]);
        args.config = Some(PathBuf::from("/nonexistent/topojoin.json"));
        assert!(args.resolve_config().is_err());
    }
}

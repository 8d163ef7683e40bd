//! Tests d'intégration de la commande de construction
//!
//! Les fichiers sont écrits dans un répertoire temporaire propre à chaque test.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use topojoin_cli::cli::{cmd_build, BuildArgs};
use topojoin_cli::input::load_inputs;

/// Répertoire de travail isolé
fn workdir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("topojoin-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &Value) -> PathBuf {
    std::fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    path.to_path_buf()
}

fn args(inputs: Vec<PathBuf>, out: &Path) -> BuildArgs {
    BuildArgs {
        inputs,
        out: Some(out.to_path_buf()),
        quantization: Some(3),
        properties: None,
        property_pattern: None,
        config: None,
        pretty: false,
        report: None,
    }
}

fn squares(dir: &Path) -> Vec<PathBuf> {
    let left = write_json(
        &dir.join("left.geojson"),
        &json!({"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": "L",
            "properties": {"NOM": "Gauche", "pop_2020": 120, "surface": 1.0},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}
        }]}),
    );
    let right = write_json(
        &dir.join("right.geojson"),
        &json!({"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": "R",
            "properties": {"NOM": "Droite", "pop_2020": 80, "surface": 1.0},
            "geometry": {"type": "Polygon", "coordinates": [[[1, 0], [2, 0], [2, 1], [1, 1], [1, 0]]]}
        }]}),
    );
    vec![left, right]
}

#[test]
fn test_build_shared_border() {
    let dir = workdir("shared-border");
    let out = dir.join("topo.json");
    let report_path = dir.join("report.json");

    let mut args = args(squares(&dir), &out);
    args.report = Some(report_path.clone());
    let report = cmd_build(&args, true).unwrap();

    assert_eq!(report.objects, 2);
    assert_eq!(report.arcs, 3);
    assert_eq!(report.input_positions, 10);
    assert_eq!(report.bounds.unwrap().0, [0.0, 0.0, 2.0, 1.0]);

    let topology: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(topology["type"], "Topology");
    assert_eq!(
        topology["transform"],
        json!({"scale": [1.0, 0.5], "translate": [0.0, 0.0]})
    );
    assert_eq!(topology["arcs"].as_array().unwrap().len(), 3);

    // Un objet par fichier, dans l'ordre des arguments
    let names: Vec<&String> = topology["objects"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["left", "right"]);
    assert_eq!(
        topology["objects"]["left"]["geometries"][0],
        json!({"type": "Polygon", "arcs": [[0, 1]], "id": "L"})
    );
    assert_eq!(
        topology["objects"]["right"]["geometries"][0]["arcs"],
        json!([[-1, 2]])
    );

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(saved["arcs"], 3);
    assert_eq!(saved["by_object"][0]["name"], "left");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_build_with_properties() {
    let dir = workdir("properties");
    let out = dir.join("topo.json");

    let mut args = args(squares(&dir), &out);
    args.properties = Some("nom=NOM".to_string());
    args.property_pattern = Some("^pop_".to_string());
    cmd_build(&args, true).unwrap();

    let topology: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        topology["objects"]["left"]["geometries"][0]["properties"],
        json!({"nom": "Gauche", "pop_2020": 120})
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_build_with_config_file() {
    let dir = workdir("config");
    let out = dir.join("topo.json");
    let config = write_json(
        &dir.join("topojoin.json"),
        &json!({"quantization": 0, "properties": ["NOM"]}),
    );

    let mut args = args(squares(&dir), &out);
    args.quantization = None;
    args.config = Some(config);
    args.pretty = true;
    let report = cmd_build(&args, true).unwrap();
    assert_eq!(report.quantization, 0);

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains('\n'));
    let topology: Value = serde_json::from_str(&content).unwrap();
    assert!(topology.get("transform").is_none());
    assert_eq!(topology["arcs"][0], json!([[1.0, 0.0], [1.0, 1.0]]));
    assert_eq!(
        topology["objects"]["right"]["geometries"][0]["properties"],
        json!({"NOM": "Droite"})
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_duplicate_file_stems_are_rejected() {
    let dir = workdir("duplicates");
    std::fs::create_dir_all(dir.join("other")).unwrap();
    let line = json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]});
    let a = write_json(&dir.join("roads.geojson"), &line);
    let b = write_json(&dir.join("other").join("roads.json"), &line);

    let err = load_inputs(&[a, b]).unwrap_err();
    assert!(err.to_string().contains("Duplicate object name 'roads'"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_invalid_inputs_are_reported() {
    let dir = workdir("invalid");
    let out = dir.join("topo.json");

    let broken = dir.join("broken.geojson");
    std::fs::write(&broken, "{\"type\": \"Polygon\"").unwrap();
    let err = cmd_build(&args(vec![broken], &out), true).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid GeoJSON"));

    let missing = dir.join("missing.geojson");
    let err = cmd_build(&args(vec![missing], &out), true).unwrap_err();
    assert!(format!("{err:#}").contains("Cannot read"));

    let point = write_json(
        &dir.join("point.geojson"),
        &json!({"type": "Point", "coordinates": [0, 0]}),
    );
    let mut one = args(vec![point], &out);
    one.quantization = Some(1);
    let err = cmd_build(&one, true).unwrap_err();
    assert!(format!("{err:#}").contains("quantization"));

    let _ = std::fs::remove_dir_all(&dir);
}

//! Directory-driven deployment: walks `<root>/{Sequences,APIs,Endpoints,
//! Inbounds}/*.xml` in that fixed order and inserts parsed artifacts into
//! an `ArtifactGraph`. Per-file errors are logged and the file is
//! skipped; they never abort the rest of the deployment.

use crate::api_parser::parse_api;
use crate::cursor::Cursor;
use crate::endpoint_parser::parse_endpoint;
use crate::error::DeployError;
use crate::inbound_parser::parse_inbound;
use crate::sequence_parser::parse_named_sequence;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use sy_model::ArtifactGraph;
use tracing::{error, info, warn};

pub fn deploy(root: &Path) -> ArtifactGraph {
    let mut graph = ArtifactGraph::new();

    load_dir(root, "Sequences", &mut graph, |cursor, graph, path| {
        let sequence = parse_named_sequence(cursor, &file_stem(path))?;
        graph
            .insert_sequence(sequence)
            .map_err(|e| DeployError::model(cursor.position(), e))
    });

    load_dir(root, "APIs", &mut graph, |cursor, graph, _path| {
        let api = parse_api(cursor)?;
        api.validate().map_err(|e| DeployError::model(api.position.clone(), e))?;
        graph.insert_api(api).map_err(|e| DeployError::model(cursor.position(), e))
    });

    load_dir(root, "Endpoints", &mut graph, |cursor, graph, _path| {
        let endpoint = parse_endpoint(cursor)?;
        graph
            .insert_endpoint(endpoint)
            .map_err(|e| DeployError::model(cursor.position(), e))
    });

    load_dir(root, "Inbounds", &mut graph, |cursor, graph, _path| {
        let inbound = parse_inbound(cursor)?;
        graph
            .insert_inbound(inbound)
            .map_err(|e| DeployError::model(cursor.position(), e))
    });

    for inbound in graph.inbounds().collect::<Vec<_>>() {
        if graph.sequence(&inbound.sequence_ref).is_none() {
            warn!(
                inbound = %inbound.name,
                sequence = %inbound.sequence_ref,
                "inbound references an unknown sequence, it will never run"
            );
        }
    }

    graph
}

fn file_stem(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
}

fn load_dir<F>(root: &Path, subdir: &str, graph: &mut ArtifactGraph, mut parse_and_insert: F)
where
    F: FnMut(&mut Cursor<BufReader<File>>, &mut ArtifactGraph, &Path) -> Result<(), DeployError>,
{
    let dir = root.join(subdir);
    let entries = match std::fs::read_dir(&dir) {
        Ok(e) => e,
        Err(e) => {
            info!(dir = %dir.display(), error = %e, "deployment subdirectory not present, skipping");
            return;
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "xml").unwrap_or(false))
        .collect();
    paths.sort();

    for path in paths {
        if let Err(e) = load_one(&path, graph, &mut parse_and_insert) {
            error!(file = %path.display(), error = %e, "failed to deploy artifact, skipping");
        }
    }
}

fn load_one<F>(path: &Path, graph: &mut ArtifactGraph, parse_and_insert: &mut F) -> Result<(), DeployError>
where
    F: FnMut(&mut Cursor<BufReader<File>>, &mut ArtifactGraph, &Path) -> Result<(), DeployError>,
{
    let file = File::open(path).map_err(|e| DeployError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);
    let mut cursor = Cursor::new(reader, path.display().to_string(), file_stem(path))?;
    parse_and_insert(&mut cursor, graph, path)?;
    info!(file = %path.display(), "deployed artifact");
    Ok(())
}

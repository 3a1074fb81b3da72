//! Encode command implementation.

use crate::json::from_json;
use objpack::{CodecConfig, DocumentLayout, encode_with};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension given to encoded documents.
pub const DOCUMENT_EXTENSION: &str = "opk";

/// Outcome of encoding one input.
struct EncodeReport {
    input: PathBuf,
    output: PathBuf,
    json_len: usize,
    layout: DocumentLayout,
}

pub fn cmd_encode(inputs: &[PathBuf], output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }

    let config = CodecConfig::default();
    let results: Vec<Result<EncodeReport, String>> = inputs
        .par_iter()
        .map(|input| {
            let target = match output {
                Some(path) => path.to_path_buf(),
                None => input.with_extension(DOCUMENT_EXTENSION),
            };
            encode_file(input, &target, &config).map_err(|e| format!("{}: {}", input.display(), e))
        })
        .collect();

    let mut failures = 0usize;
    for result in results {
        match result {
            Ok(report) => {
                let ratio = if report.json_len > 0 {
                    report.layout.total_len() as f64 / report.json_len as f64 * 100.0
                } else {
                    0.0
                };
                println!(
                    "{} -> {} ({} bytes, {} strings, {:.1}% of JSON)",
                    report.input.display(),
                    report.output.display(),
                    report.layout.total_len(),
                    report.layout.string_count,
                    ratio
                );
            }
            Err(message) => {
                eprintln!("Error: {}", message);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} inputs failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn encode_file(
    input: &Path,
    output: &Path,
    config: &CodecConfig,
) -> Result<EncodeReport, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    debug!(input = %input.display(), "parsed JSON");

    let value = from_json(&json);
    let bytes = encode_with(&value, config)?;
    let layout = DocumentLayout::parse(&bytes)?;
    fs::write(output, &bytes)?;
    info!(output = %output.display(), bytes = bytes.len(), "wrote document");

    Ok(EncodeReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        json_len: text.len(),
        layout,
    })
}

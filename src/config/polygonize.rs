use crate::pipeline::{AssemblyParams, PipelineParams};
use crate::polygon::RingFormat;
use crate::tokenizer::TokenizerParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct PolygonizeConfig {
    /// Recorded model outputs (`ModelOutputDump` JSON).
    pub input: PathBuf,
    #[serde(default)]
    pub tokenizer: TokenizerParams,
    #[serde(default)]
    pub assembly: AssemblyConfig,
    pub output: PolygonizeOutputConfig,
}

impl PolygonizeConfig {
    pub fn resolve_params(&self) -> Result<PipelineParams, String> {
        Ok(PipelineParams {
            tokenizer: self.tokenizer.clone(),
            assembly: self.assembly.resolve()?,
            ..Default::default()
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub format: Option<RingFormat>,
}

impl AssemblyConfig {
    pub fn resolve(&self) -> Result<AssemblyParams, String> {
        let mut params = AssemblyParams::default();
        if let Some(v) = self.format {
            v.validate()
                .map_err(|e| format!("Invalid assembly format: {e}"))?;
            params.format = v;
        }
        Ok(params)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PolygonizeOutputConfig {
    pub dir: PathBuf,
    pub result_json: PathBuf,
    /// Also print a text summary to stdout.
    #[serde(default)]
    pub print_summary: bool,
}

impl PolygonizeOutputConfig {
    pub fn result_path(&self) -> PathBuf {
        resolve_path(&self.dir, &self.result_json)
    }
}

pub fn load_config(path: &Path) -> Result<PolygonizeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<PolygonizeConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use perimeter::{AttributeKeys, HolePolicy, LabeledPoint, VerificationRequest};

/// Run file: dataset, target and points for a verification run
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub strict_geometry: bool,
    pub holes: Option<HolePolicy>,
    pub target: Option<TargetConfig>,
    pub keys: Option<AttributeKeys>,
    #[serde(default)]
    pub points: Vec<LabeledPoint>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub area: Option<String>,
}

impl RunConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: RunConfig = toml::from_str(&content).context("Failed to parse config file")?;

        // Relative dataset paths are resolved against the config file
        if let (Some(dataset), Some(dir)) = (config.dataset.as_mut(), path.parent()) {
            if dataset.is_relative() {
                *dataset = dir.join(&*dataset);
            }
        }

        Ok(config)
    }
}

/// Values given on the command line; each one set wins over the run file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub file: Option<PathBuf>,
    pub name: Option<String>,
    pub area: Option<String>,
    pub points: Vec<LabeledPoint>,
    pub holes: bool,
    pub strict_geometry: bool,
}

/// Everything a run needs once the command line and run file are combined
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub dataset: PathBuf,
    pub request: VerificationRequest,
    pub policy: HolePolicy,
    pub keys: AttributeKeys,
    pub strict_geometry: bool,
}

impl RunConfig {
    /// Combine with command line values.
    ///
    /// Dataset, name and area from the command line replace the run file's;
    /// command line points are appended after the run file's points.
    pub fn merge(self, cli: CliOverrides) -> Result<RunPlan> {
        let dataset = cli
            .file
            .or(self.dataset)
            .context("No dataset given (use --file or `dataset` in the config)")?;

        let (config_name, config_area) = match self.target {
            Some(target) => (Some(target.name), target.area),
            None => (None, None),
        };
        let target_name = cli
            .name
            .or(config_name)
            .context("No target name given (use --name or [target] in the config)")?;

        let mut points = self.points;
        points.extend(cli.points);

        let policy = if cli.holes {
            HolePolicy::SubtractHoles
        } else {
            self.holes.unwrap_or_default()
        };

        Ok(RunPlan {
            dataset,
            request: VerificationRequest {
                target_name,
                required_area: cli.area.or(config_area),
                points,
            },
            policy,
            keys: self.keys.unwrap_or_default(),
            strict_geometry: cli.strict_geometry || self.strict_geometry,
        })
    }
}

/// Parse `LABEL=LNG,LAT`
pub fn parse_point(s: &str) -> Result<LabeledPoint, String> {
    let (label, coords) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=LNG,LAT, got {:?}", s))?;
    let (lng, lat) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected LNG,LAT after '=', got {:?}", coords))?;

    let label = label.trim();
    if label.is_empty() {
        return Err("point label must not be empty".to_string());
    }
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude {:?}: {}", lng, e))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude {:?}: {}", lat, e))?;

    Ok(LabeledPoint::new(label, lng, lat))
}

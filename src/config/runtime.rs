use crate::params::{
    BinMethod, DescriptorParams, Normalizer, PolyChoice, ShollParams,
};
use crate::types::{PointI3, ThresholdBand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Write the full JSON report here.
    pub json_out: Option<PathBuf>,
    /// Write the intersections mask as a PNG here.
    pub mask_out: Option<PathBuf>,
}

/// Analysis knobs as they appear in a config file or on the command line.
/// Resolved against the loaded image by [`AnalysisConfig::resolve`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub center_x: i32,
    pub center_y: i32,
    pub start_radius: f64,
    /// Missing end radius extends to the most distant image corner.
    pub end_radius: Option<f64>,
    pub step_radius: f64,
    /// Physical size of one pixel (unit of the radii).
    pub pixel_size: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub spans: usize,
    pub bin_method: BinMethod,
    pub spike_suppression: bool,
    pub normalizer: Normalizer,
    pub poly: PolyChoice,
    pub enclosing_cutoff: f64,
    pub primary_branches: Option<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            center_x: 0,
            center_y: 0,
            start_radius: 10.0,
            end_radius: None,
            step_radius: 1.0,
            pixel_size: 1.0,
            lower_threshold: 1.0,
            upper_threshold: 255.0,
            spans: 1,
            bin_method: BinMethod::Mean,
            spike_suppression: true,
            normalizer: Normalizer::Area,
            poly: PolyChoice::BestFit,
            enclosing_cutoff: 1.0,
            primary_branches: None,
        }
    }
}

impl AnalysisConfig {
    /// Resolve into sampler/descriptor parameters for a `w × h` image.
    pub fn resolve(&self, w: usize, h: usize) -> (ShollParams, DescriptorParams) {
        let center = PointI3::new(self.center_x, self.center_y, 0);
        let end_radius = self.end_radius.unwrap_or_else(|| {
            let dx = self.center_x.max(w as i32 - self.center_x) as f64;
            let dy = self.center_y.max(h as i32 - self.center_y) as f64;
            (dx * dx + dy * dy).sqrt() * self.pixel_size
        });
        let mut params = ShollParams::for_image(center, w, h);
        params.start_radius = self.start_radius;
        params.end_radius = end_radius;
        params.step_radius = self.step_radius;
        params.vx_wh = self.pixel_size;
        params.vx_d = self.pixel_size;
        params.threshold = ThresholdBand::new(self.lower_threshold, self.upper_threshold);
        params.spans = self.spans;
        params.bin_method = self.bin_method;
        params.spike_suppression = self.spike_suppression;

        let descriptors = DescriptorParams {
            enclosing_cutoff: self.enclosing_cutoff,
            primary_branches: self.primary_branches,
            poly: self.poly,
            normalizer: self.normalizer,
        };
        (params, descriptors)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Read a [`RuntimeConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

const USAGE: &str = "\
Usage: sholl_demo [OPTIONS] <image>

Options:
  --config <file>       JSON runtime configuration (flags below override it)
  --center <x> <y>      Center of analysis in pixels (required unless set in config)
  --start <radius>      First sampled radius (default 10)
  --end <radius>        Last sampled radius (default: image edge)
  --step <radius>       Radius step (default 1)
  --pixel-size <size>   Physical size of one pixel (default 1)
  --lower <value>       Lower threshold (default 1)
  --upper <value>       Upper threshold (default 255)
  --spans <n>           Samples per radius, 1-10 (default 1)
  --bin <method>        mean | median | mode (default mean)
  --no-spike-suppression
  --json-out <file>     Write the JSON report
  --mask-out <file>     Write the intersections mask PNG
";

/// Assemble a [`RuntimeConfig`] from command-line arguments.
pub fn parse_cli(args: &[String]) -> Result<RuntimeConfig, String> {
    let mut config: Option<RuntimeConfig> = None;
    let mut analysis = AnalysisConfig::default();
    let mut output = OutputConfig::default();
    let mut input_path: Option<PathBuf> = None;
    let mut center_seen = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} expects a value\n\n{USAGE}"))
        };
        match arg.as_str() {
            "--config" => {
                let loaded = load_config(Path::new(&value("--config")?))?;
                analysis = loaded.analysis.clone();
                output = loaded.output.clone();
                center_seen = true;
                config = Some(loaded);
            }
            "--center" => {
                analysis.center_x = parse_num(&value("--center")?, "--center x")?;
                analysis.center_y = parse_num(&value("--center")?, "--center y")?;
                center_seen = true;
            }
            "--start" => analysis.start_radius = parse_num(&value("--start")?, "--start")?,
            "--end" => analysis.end_radius = Some(parse_num(&value("--end")?, "--end")?),
            "--step" => analysis.step_radius = parse_num(&value("--step")?, "--step")?,
            "--pixel-size" => {
                analysis.pixel_size = parse_num(&value("--pixel-size")?, "--pixel-size")?
            }
            "--lower" => analysis.lower_threshold = parse_num(&value("--lower")?, "--lower")?,
            "--upper" => analysis.upper_threshold = parse_num(&value("--upper")?, "--upper")?,
            "--spans" => analysis.spans = parse_num(&value("--spans")?, "--spans")?,
            "--bin" => {
                analysis.bin_method = match value("--bin")?.as_str() {
                    "mean" => BinMethod::Mean,
                    "median" => BinMethod::Median,
                    "mode" => BinMethod::Mode,
                    other => return Err(format!("Unknown bin method '{other}'\n\n{USAGE}")),
                }
            }
            "--no-spike-suppression" => analysis.spike_suppression = false,
            "--json-out" => output.json_out = Some(PathBuf::from(value("--json-out")?)),
            "--mask-out" => output.mask_out = Some(PathBuf::from(value("--mask-out")?)),
            "--help" | "-h" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{other}'\n\n{USAGE}"));
            }
            positional => input_path = Some(PathBuf::from(positional)),
        }
    }

    let input_path = input_path
        .or(config.map(|c| c.input_path))
        .ok_or_else(|| format!("No input image given\n\n{USAGE}"))?;
    if !center_seen {
        return Err(format!("--center is required\n\n{USAGE}"));
    }
    Ok(RuntimeConfig {
        input_path,
        output,
        analysis,
    })
}

fn parse_num<T: std::str::FromStr>(text: &str, name: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("Invalid value '{text}' for {name}\n\n{USAGE}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cli_flags_build_a_runtime_config() {
        let config = parse_cli(&args(&[
            "--center", "50", "50", "--start", "5", "--end", "25", "--step", "5", "--spans", "3",
            "--bin", "median", "arbor.png",
        ]))
        .unwrap();
        assert_eq!(config.input_path, PathBuf::from("arbor.png"));
        assert_eq!(config.analysis.center_x, 50);
        assert_eq!(config.analysis.end_radius, Some(25.0));
        assert_eq!(config.analysis.spans, 3);
        assert_eq!(config.analysis.bin_method, BinMethod::Median);
    }

    #[test]
    fn missing_center_is_rejected() {
        let err = parse_cli(&args(&["arbor.png"])).unwrap_err();
        assert!(err.contains("--center"));
    }

    #[test]
    fn resolved_end_radius_reaches_the_far_corner() {
        let analysis = AnalysisConfig {
            center_x: 10,
            center_y: 10,
            ..Default::default()
        };
        let (params, _) = analysis.resolve(100, 50);
        let expected = ((90.0f64 * 90.0) + (40.0 * 40.0)).sqrt();
        assert!((params.end_radius - expected).abs() < 1e-9);
    }

    #[test]
    fn config_json_round_trips() {
        let json = r#"{
            "input_path": "cell.png",
            "output": { "json_out": "report.json" },
            "analysis": { "center_x": 40, "center_y": 60, "spans": 2 }
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.analysis.center_x, 40);
        assert_eq!(config.analysis.spans, 2);
        assert_eq!(config.output.json_out, Some(PathBuf::from("report.json")));
    }
}

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub probe: Probe,
    pub timing: Timing,
    pub formats: Formats,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("timemap.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let mut cfg = Config::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading config file: {}", path.display()))?;
            cfg = Self::from_toml_str(&raw)
                .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        }

        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let min = self.timing.min_seg_sec;
        if !min.is_finite() || min < 0.0 {
            return Err(anyhow!(
                "timing.min_seg_sec must be a non-negative number, got {min}"
            ));
        }
        if self.probe.audio_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("probe.audio_extension must not be empty"));
        }
        if self.probe.ffprobe_bin.trim().is_empty() {
            return Err(anyhow!("probe.ffprobe_bin must not be empty"));
        }
        Ok(())
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_cue_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            debug_cue_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    /// ffprobe executable, resolved through PATH unless absolute
    pub ffprobe_bin: String,
    /// Extension of the merged audio file the timemap sits next to
    pub audio_extension: String,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            ffprobe_bin: "ffprobe".to_string(),
            audio_extension: "mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Floor for a single cue before renormalization, in seconds
    pub min_seg_sec: f64,
    /// Sentences longer than twice this are hard-wrapped; 0 disables wrapping
    pub max_line_chars: usize,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            min_seg_sec: 0.6,
            max_line_chars: 18,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub srt: SrtCfg,
    pub vtt: VttCfg,
    pub tsv: TsvCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrtCfg {
    pub wrap_width: usize,
}

impl Default for SrtCfg {
    fn default() -> Self {
        Self { wrap_width: 42 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VttCfg {
    pub wrap_width: usize,
}

impl Default for VttCfg {
    fn default() -> Self {
        Self { wrap_width: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TsvCfg {
    pub time_units: String,
    pub columns: Vec<String>,
}

impl Default for TsvCfg {
    fn default() -> Self {
        Self {
            time_units: "seconds".to_string(),
            columns: vec![
                "start".to_string(),
                "end".to_string(),
                "scene".to_string(),
                "text".to_string(),
            ],
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.to_lowercase() == "json";

    if is_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json())
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .init();
    }

    tracing::debug!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}

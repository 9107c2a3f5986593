//! Media duration probing through ffprobe.

use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{bin} exited with {status}: {stderr}")]
    Exit {
        bin: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("unparsable duration {output:?}")]
    Parse { output: String },
}

/// Anything that can tell how long a media file plays, in seconds.
pub trait DurationProbe {
    fn probe(&self, path: &Path) -> Result<f64, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    bin: String,
}

impl FfprobeProbe {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.bin)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProbeError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Exit {
                bin: self.bin.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses ffprobe's bare numeric output. Rejects NaN, infinities and negatives.
pub fn parse_duration(raw: &str) -> Result<f64, ProbeError> {
    let s = raw.trim();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ProbeError::Parse {
            output: s.to_string(),
        }),
    }
}

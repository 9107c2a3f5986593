//! Scene timeline assembly and the `.timemap.json` sidecar.

use std::{fs, path::Path};

use thiserror::Error;

use crate::{
    allocate::build_cues,
    model::{BuildOutput, Scene, SceneTimelineEntry, TIMEMAP_VERSION, Timeline},
    probe::DurationProbe,
    segment::segment_scene,
};

pub const TIMEMAP_SUFFIX: &str = ".timemap.json";

#[derive(Error, Debug)]
pub enum TimemapError {
    #[error("scene count ({scenes}) does not match chunk count ({chunks})")]
    LengthMismatch { scenes: usize, chunks: usize },

    #[error("final audio path is empty")]
    EmptyFinalPath,

    #[error("failed serializing timemap: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed writing timemap {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct TimingOptions {
    pub min_seg_sec: f64,
    pub max_line_chars: usize,
    pub audio_extension: String,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            min_seg_sec: 0.6,
            max_line_chars: 18,
            audio_extension: "mp3".to_string(),
        }
    }
}

/// Probes every chunk in order, lays the scenes end to end and writes the
/// sidecar next to `final_audio_path`.
///
/// A chunk that cannot be probed counts as zero seconds; the build carries on.
pub fn build_timemap<P: AsRef<Path>>(
    scenes: &[Scene],
    chunk_paths: &[P],
    final_audio_path: &str,
    probe: &dyn DurationProbe,
    opts: &TimingOptions,
) -> Result<BuildOutput, TimemapError> {
    if scenes.len() != chunk_paths.len() {
        return Err(TimemapError::LengthMismatch {
            scenes: scenes.len(),
            chunks: chunk_paths.len(),
        });
    }
    if final_audio_path.is_empty() {
        return Err(TimemapError::EmptyFinalPath);
    }

    let span = tracing::info_span!("build_timemap", scenes = scenes.len(), final_audio_path);
    let _g = span.enter();

    let durations: Vec<f64> = chunk_paths
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let path = path.as_ref();
            match probe.probe(path) {
                Ok(d) => {
                    tracing::debug!(idx, path = %path.display(), duration = d, "probed chunk");
                    d
                }
                Err(e) => {
                    tracing::warn!(idx, path = %path.display(), error = %e, "probe failed; using 0s");
                    0.0
                }
            }
        })
        .collect();

    let timemap = assemble(scenes, &durations, opts);
    let timemap_path = derive_timemap_path(final_audio_path, &opts.audio_extension);
    write_timemap(&timemap_path, &timemap)?;

    tracing::info!(
        path = timemap_path.as_str(),
        total_duration = timemap.total_duration,
        cues = timemap.cue_count(),
        "wrote timemap"
    );

    Ok(BuildOutput {
        timemap,
        timemap_path,
    })
}

/// Lays scenes end to end given already-known durations. `durations` must
/// be as long as `scenes`; extra durations are ignored.
pub fn assemble(scenes: &[Scene], durations: &[f64], opts: &TimingOptions) -> Timeline {
    let mut acc = 0.0;
    let mut entries = Vec::with_capacity(scenes.len());

    for (idx, (scene, &duration)) in scenes.iter().zip(durations).enumerate() {
        let duration = duration.max(0.0);
        let spans = segment_scene(&scene.text, opts.max_line_chars);
        let cues = build_cues(duration, &spans, opts.min_seg_sec);

        let start = acc;
        let end = acc + duration;
        entries.push(SceneTimelineEntry {
            idx,
            id: scene
                .id
                .clone()
                .unwrap_or_else(|| format!("scene-{}", idx + 1)),
            start,
            end,
            duration,
            text: scene.text.trim().to_string(),
            cues,
        });
        acc = end;
    }

    Timeline {
        version: TIMEMAP_VERSION,
        total_duration: acc,
        scenes: entries,
    }
}

/// `out/final.mp3` becomes `out/final.timemap.json`; anything not ending in
/// `.<audio_extension>` (case-insensitive) just gets the suffix appended.
pub fn derive_timemap_path(final_audio_path: &str, audio_extension: &str) -> String {
    let ext = format!(".{}", audio_extension.trim_start_matches('.'));
    let cut = final_audio_path.len().saturating_sub(ext.len());

    match final_audio_path.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(&ext) => {
            format!("{}{TIMEMAP_SUFFIX}", &final_audio_path[..cut])
        }
        _ => format!("{final_audio_path}{TIMEMAP_SUFFIX}"),
    }
}

pub fn render_timemap(timeline: &Timeline) -> Result<String, TimemapError> {
    let mut s = serde_json::to_string_pretty(timeline)?;
    s.push('\n');
    Ok(s)
}

pub fn write_timemap(path: &str, timeline: &Timeline) -> Result<(), TimemapError> {
    let json = render_timemap(timeline)?;
    fs::write(path, json).map_err(|source| TimemapError::Write {
        path: path.to_string(),
        source,
    })
}

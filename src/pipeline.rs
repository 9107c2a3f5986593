use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    allocate::build_cues,
    cli::{BuildCmd, ExportFormat, SegmentCmd},
    config::Config,
    formats,
    model::{Scene, Timeline},
    probe::FfprobeProbe,
    segment::segment_scene,
    timemap::{self, TimingOptions},
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenesFile {
    List(Vec<Scene>),
    Wrapped { scenes: Vec<Scene> },
}

impl From<ScenesFile> for Vec<Scene> {
    fn from(f: ScenesFile) -> Self {
        match f {
            ScenesFile::List(s) | ScenesFile::Wrapped { scenes: s } => s,
        }
    }
}

pub fn timing_options(cfg: &Config) -> TimingOptions {
    TimingOptions {
        min_seg_sec: cfg.timing.min_seg_sec,
        max_line_chars: cfg.timing.max_line_chars,
        audio_extension: cfg.probe.audio_extension.clone(),
    }
}

pub fn run_build(cmd: BuildCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!(
        "build",
        scenes = cmd.scenes.as_str(),
        final_audio = cmd.final_audio.as_str()
    );
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.scenes)?;
    let scenes = parse_scenes(&raw)
        .with_context(|| format!("failed parsing scenes from {}", cmd.scenes))?;
    tracing::info!(scenes = scenes.len(), chunks = cmd.chunks.len(), "loaded scenes");

    let probe = FfprobeProbe::new(cfg.probe.ffprobe_bin.as_str());
    let out = timemap::build_timemap(
        &scenes,
        &cmd.chunks,
        &cmd.final_audio,
        &probe,
        &timing_options(cfg),
    )?;

    log_timeline_summary(&out.timemap, cfg);

    for fmt in &cmd.export {
        let rendered = render_export(&out.timemap, *fmt, cfg)?;
        let path = derive_export_path(&cmd.final_audio, &cfg.probe.audio_extension, *fmt);
        write_output(&path, &rendered, cmd.overwrite)?;
        tracing::info!(path = path.as_str(), format = ?fmt, "wrote export");
    }

    println!("{}", out.timemap_path);
    Ok(())
}

pub fn run_segment(cmd: SegmentCmd, cfg: &Config) -> Result<()> {
    let text = if cmd.text == "-" {
        read_input_to_string("-")?
    } else {
        cmd.text
    };
    let rendered = render_segment(&text, cmd.duration, cfg)?;
    println!("{rendered}");
    Ok(())
}

fn render_segment(text: &str, duration: Option<f64>, cfg: &Config) -> Result<String> {
    let spans = segment_scene(text, cfg.timing.max_line_chars);
    tracing::debug!(spans = spans.len(), "segmented text");

    let rendered = match duration {
        Some(d) if !d.is_finite() || d < 0.0 => {
            return Err(anyhow!("duration must be a non-negative number, got {d}"));
        }
        Some(d) => {
            let cues = build_cues(d, &spans, cfg.timing.min_seg_sec);
            serde_json::to_string_pretty(&cues)?
        }
        None => serde_json::to_string_pretty(&spans)?,
    };
    Ok(rendered)
}

fn parse_scenes(raw: &str) -> Result<Vec<Scene>> {
    let f: ScenesFile = serde_json::from_str(raw)
        .map_err(|e| anyhow!("expected a scene array or {{\"scenes\": [...]}}: {e}"))?;
    Ok(f.into())
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed reading {input}"))
    }
}

fn log_timeline_summary(t: &Timeline, cfg: &Config) {
    tracing::info!(
        scenes = t.scenes.len(),
        cues = t.cue_count(),
        total_duration = t.total_duration,
        "timeline summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_cue_samples;
        for c in t.global_cues().iter().take(n) {
            tracing::debug!(
                scene = c.scene_idx,
                start = c.start,
                end = c.end,
                chars = c.text.chars().count(),
                "cue sample"
            );
        }
    }
}

fn render_export(t: &Timeline, fmt: ExportFormat, cfg: &Config) -> Result<String> {
    match fmt {
        ExportFormat::Srt => Ok(formats::srt::write_srt(t, cfg)),
        ExportFormat::Vtt => Ok(formats::vtt::write_vtt(t, cfg)),
        ExportFormat::Tsv => formats::tsv::write_tsv(t, cfg),
    }
}

fn derive_export_path(final_audio: &str, audio_extension: &str, fmt: ExportFormat) -> String {
    let sidecar = timemap::derive_timemap_path(final_audio, audio_extension);
    let base = sidecar
        .strip_suffix(timemap::TIMEMAP_SUFFIX)
        .unwrap_or(final_audio);
    format!("{base}.{}", fmt.extension())
}

fn write_output(path: &str, data: &str, overwrite: bool) -> Result<()> {
    if Path::new(path).exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {path}"
        ));
    }
    fs::write(path, data).with_context(|| format!("failed writing {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_wrapped_scene_lists() {
        let bare = parse_scenes(r#"[{"text": "a"}, {"id": "x", "text": "b"}]"#).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1].id.as_deref(), Some("x"));

        let wrapped = parse_scenes(r#"{"scenes": [{"id": null, "text": "a"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 1);
        assert!(wrapped[0].id.is_none());
    }

    #[test]
    fn rejects_non_scene_json() {
        assert!(parse_scenes(r#"{"nope": 1}"#).is_err());
        assert!(parse_scenes("not json").is_err());
    }

    #[test]
    fn segment_takes_literal_text() {
        let cfg = Config::default();
        let text = "Hello there. How are you?";
        run_segment(
            SegmentCmd {
                text: text.to_string(),
                duration: None,
            },
            &cfg,
        )
        .unwrap();
        run_segment(
            SegmentCmd {
                text: text.to_string(),
                duration: Some(3.0),
            },
            &cfg,
        )
        .unwrap();
    }

    #[test]
    fn segment_renders_spans_or_cues() {
        let cfg = Config::default();
        let spans: Vec<serde_json::Value> =
            serde_json::from_str(&render_segment("Hi. Yo.", None, &cfg).unwrap()).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1]["text"], "Yo.");

        let cues: Vec<serde_json::Value> =
            serde_json::from_str(&render_segment("Hi. Yo.", Some(3.0), &cfg).unwrap()).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1]["end"], 3.0);
    }

    #[test]
    fn segment_rejects_negative_duration() {
        let cmd = SegmentCmd {
            text: "Hi.".to_string(),
            duration: Some(-1.0),
        };
        assert!(run_segment(cmd, &Config::default()).is_err());
    }

    #[test]
    fn export_paths_sit_next_to_final_audio() {
        assert_eq!(
            derive_export_path("out/final.MP3", "mp3", ExportFormat::Srt),
            "out/final.srt"
        );
        assert_eq!(
            derive_export_path("out/final.wav", "mp3", ExportFormat::Vtt),
            "out/final.wav.vtt"
        );
    }

    #[test]
    fn exports_refuse_to_clobber_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final.srt");
        let path = path.to_string_lossy();
        write_output(&path, "one", false).unwrap();
        assert!(write_output(&path, "two", false).is_err());
        write_output(&path, "two", true).unwrap();
        assert_eq!(fs::read_to_string(&*path).unwrap(), "two");
    }

    #[test]
    fn build_writes_timemap_and_exports_with_missing_probe() {
        let dir = tempfile::tempdir().unwrap();
        let scenes_path = dir.path().join("scenes.json");
        fs::write(&scenes_path, r#"[{"text": "Hello there."}]"#).unwrap();
        let final_audio = dir.path().join("final.mp3");

        let mut cfg = Config::default();
        cfg.probe.ffprobe_bin = "definitely-not-an-ffprobe-binary-4b1e".to_string();

        let cmd = BuildCmd {
            scenes: scenes_path.to_string_lossy().to_string(),
            chunks: vec![dir.path().join("chunk0.mp3")],
            final_audio: final_audio.to_string_lossy().to_string(),
            export: vec![ExportFormat::Srt],
            overwrite: false,
        };
        run_build(cmd, &cfg).unwrap();

        let json = fs::read_to_string(dir.path().join("final.timemap.json")).unwrap();
        let t: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(t.total_duration, 0.0);
        assert_eq!(t.scenes[0].duration, 0.0);
        assert!(dir.path().join("final.srt").exists());
    }
}

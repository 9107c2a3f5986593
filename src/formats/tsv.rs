use anyhow::{Result, anyhow};
use csv::WriterBuilder;

use crate::{
    config::Config,
    formats::time::{format_vtt_timestamp, seconds_to_ms},
    model::{GlobalCue, Timeline},
};

pub fn write_tsv(t: &Timeline, cfg: &Config) -> Result<String> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(vec![]);

    let cols = &cfg.formats.tsv.columns;
    wtr.write_record(cols)?;

    for cue in t.global_cues() {
        let row: Vec<String> = cols
            .iter()
            .map(|c| value_for_column(c, &cue, cfg))
            .collect();
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| anyhow!(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn value_for_column(col: &str, cue: &GlobalCue, cfg: &Config) -> String {
    match col {
        "start" => fmt_time(cue.start, cfg),
        "end" => fmt_time(cue.end, cfg),
        "scene" => cue.scene_id.clone(),
        "scene_idx" => cue.scene_idx.to_string(),
        "text" => cue.text.clone(),
        _ => "".to_string(),
    }
}

fn fmt_time(seconds: f64, cfg: &Config) -> String {
    match cfg.formats.tsv.time_units.as_str() {
        "ms" => seconds_to_ms(seconds).to_string(),
        "timestamp" => format_vtt_timestamp(seconds),
        _ => format!("{seconds:.3}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Scene,
        timemap::{TimingOptions, assemble},
    };

    fn timeline() -> Timeline {
        assemble(
            &[Scene::with_id("intro", "Hi. Yo."), Scene::new("Bye")],
            &[2.0, 0.5],
            &TimingOptions::default(),
        )
    }

    #[test]
    fn default_columns_in_seconds() {
        let tsv = write_tsv(&timeline(), &Config::default()).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "start\tend\tscene\ttext");
        assert_eq!(lines[1], "0.000\t1.000\tintro\tHi.");
        assert_eq!(lines[3], "2.000\t2.500\tscene-2\tBye");
    }

    #[test]
    fn millisecond_units() {
        let mut cfg = Config::default();
        cfg.formats.tsv.time_units = "ms".to_string();
        cfg.formats.tsv.columns = vec!["scene_idx".to_string(), "end".to_string()];
        let tsv = write_tsv(&timeline(), &cfg).unwrap();
        assert_eq!(tsv, "scene_idx\tend\n0\t1000\n0\t2000\n1\t2500\n");
    }
}

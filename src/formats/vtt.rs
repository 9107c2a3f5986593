use textwrap::wrap;

use crate::{config::Config, formats::time::format_vtt_timestamp, model::Timeline};

pub fn write_vtt(t: &Timeline, cfg: &Config) -> String {
    let mut out = String::from("WEBVTT\n\n");

    for cue in t.global_cues() {
        out.push_str(&format!(
            "{} --> {}\n",
            format_vtt_timestamp(cue.start),
            format_vtt_timestamp(cue.end)
        ));
        for line in wrap(cue.text.trim(), cfg.formats.vtt.wrap_width.max(1)) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

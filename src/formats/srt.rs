use textwrap::wrap;

use crate::{config::Config, formats::time::format_srt_timestamp, model::Timeline};

pub fn write_srt(t: &Timeline, cfg: &Config) -> String {
    let mut out = String::new();

    for (i, cue) in t.global_cues().iter().enumerate() {
        out.push_str(&(i + 1).to_string());
        out.push('\n');

        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(cue.start),
            format_srt_timestamp(cue.end)
        ));

        for line in wrap(cue.text.trim(), cfg.formats.srt.wrap_width.max(1)) {
            out.push_str(&line);
            out.push('\n');
        }

        out.push('\n');
    }

    out
}

pub fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

pub fn format_srt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds_to_ms(seconds), ',')
}

pub fn format_vtt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds_to_ms(seconds), '.')
}

fn format_timestamp(ms_in: i64, ms_sep: char) -> String {
    let ms = ms_in.max(0);

    let total_seconds = ms / 1000;
    let milli = ms % 1000;

    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{min:02}:{sec:02}{ms_sep}{milli:03}")
}

use crate::{
    model::{Cue, SentenceSpan},
    segment::char_len,
};

/// Splits `duration` seconds across `spans` by visible character count.
///
/// Each span first gets `max(min_seg_sec, share)`, then every slot is rescaled
/// so the slots sum to `duration`. The returned `(start, end)` pairs are
/// contiguous from 0 and the last `end` is exactly `duration`.
pub fn allocate(duration: f64, spans: &[SentenceSpan], min_seg_sec: f64) -> Vec<(f64, f64)> {
    if spans.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = spans.iter().map(|s| char_len(&s.text).max(1) as f64).collect();
    let total_weight: f64 = weights.iter().sum();

    let mut slots: Vec<f64> = weights
        .iter()
        .map(|w| min_seg_sec.max(duration * w / total_weight))
        .collect();

    let sum: f64 = slots.iter().sum();
    if duration > 0.0 && sum > 0.0 {
        let k = duration / sum;
        for s in &mut slots {
            *s *= k;
        }
    } else {
        slots.iter_mut().for_each(|s| *s = 0.0);
    }

    let mut out = Vec::with_capacity(slots.len());
    let mut cursor = 0.0;
    let last = slots.len() - 1;
    for (i, slot) in slots.iter().enumerate() {
        let end = if i == last { duration.max(0.0) } else { cursor + slot };
        out.push((cursor, end));
        cursor = end;
    }
    out
}

/// Timed cues for one scene, relative to the scene start.
///
/// A scene with no playable duration collapses to one zero-length cue
/// carrying all of its text.
pub fn build_cues(duration: f64, spans: &[SentenceSpan], min_seg_sec: f64) -> Vec<Cue> {
    if spans.is_empty() {
        return Vec::new();
    }

    if duration <= 0.0 {
        let text = spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return vec![Cue {
            index: 0,
            start: 0.0,
            end: 0.0,
            text,
        }];
    }

    allocate(duration, spans, min_seg_sec)
        .into_iter()
        .zip(spans)
        .enumerate()
        .map(|(index, ((start, end), span))| Cue {
            index,
            start,
            end,
            text: span.text.clone(),
        })
        .collect()
}

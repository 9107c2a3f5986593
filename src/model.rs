use serde::{Deserialize, Serialize};

pub const TIMEMAP_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
impl Scene {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub text: String,
}

/// A subtitle span; `start`/`end` are seconds relative to its scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[cfg(test)]
impl Cue {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// One scene on the global timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTimelineEntry {
    pub idx: usize,
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub text: String,
    pub cues: Vec<Cue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub version: u32,
    #[serde(rename = "totalDuration")]
    pub total_duration: f64,
    pub scenes: Vec<SceneTimelineEntry>,
}

impl Timeline {
    pub fn cue_count(&self) -> usize {
        self.scenes.iter().map(|s| s.cues.len()).sum()
    }

    /// Cues shifted onto the global timeline, in playback order.
    pub fn global_cues(&self) -> Vec<GlobalCue> {
        self.scenes
            .iter()
            .flat_map(|s| {
                s.cues.iter().map(move |c| GlobalCue {
                    scene_idx: s.idx,
                    scene_id: s.id.clone(),
                    start: s.start + c.start,
                    end: s.start + c.end,
                    text: c.text.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalCue {
    pub scene_idx: usize,
    pub scene_id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub timemap: Timeline,
    pub timemap_path: String,
}

//! Ordered symbol catalog: stage `n` holds the kanji written with `n` strokes.

use rand::seq::SliceRandom;
use rand::Rng;

pub const KANJI_BY_STROKES: &[&[char]] = &[
    &['一'],
    &['二', '十'],
    &['三', '土', '川', '山'],
    &['四', '火', '水', '天', '月'],
    &['五', '木', '王', '右', '左', '中'],
    &['六', '石', '竹', '糸', '耳'],
    &['七', '足', '見', '貝', '車'],
    &['八', '金', '雨', '青', '草'],
    &['九', '音', '風', '食', '飛'],
    &['十', '馬', '魚', '鳥', '高'],
];

/// Level 1 places this many stages plus one; each later level adds another.
const BASE_STAGES: u32 = 4;

#[derive(Clone, Copy, Debug)]
pub struct OrderSequence {
    stages: &'static [&'static [char]],
}

impl Default for OrderSequence {
    fn default() -> Self {
        Self::new(KANJI_BY_STROKES)
    }
}

impl OrderSequence {
    pub const fn new(stages: &'static [&'static [char]]) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> u32 {
        self.stages.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of stages placed on a level: `level + 4`, capped by the catalog.
    pub fn max_stage_for_level(&self, level: u32) -> u32 {
        level.saturating_add(BASE_STAGES).min(self.len())
    }

    /// Candidates for a 1-based stage.
    pub fn candidates(&self, stage: u32) -> Option<&'static [char]> {
        let idx = stage.checked_sub(1)? as usize;
        self.stages.get(idx).copied()
    }

    pub fn pick(&self, stage: u32, rng: &mut impl Rng) -> Option<char> {
        self.candidates(stage)?.choose(rng).copied()
    }
}

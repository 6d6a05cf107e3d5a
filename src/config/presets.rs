/// Example players for seeding a demo roster
///
/// The slug is the part after "user/" in a start.gg profile URL,
/// an 8-character code like `2a371960`.
#[derive(Debug, Clone)]
pub struct PresetPlayer {
    pub slug: &'static str,
    pub name: &'static str,
}

impl PresetPlayer {
    pub fn new(slug: &'static str, name: &'static str) -> Self {
        Self { slug, name }
    }
}

/// Minimum roster size for a meaningful ranking
pub const MIN_ROSTER_FOR_RANKINGS: usize = 2;

/// Get the example players used by `roster demo`
pub fn preset_players() -> Vec<PresetPlayer> {
    vec![
        PresetPlayer::new("2a371960", "Zain"),
        PresetPlayer::new("da8b9c25", "Cody Schwab"),
        PresetPlayer::new("076502c1", "Hungrybox"),
        PresetPlayer::new("cfe7a825", "aMSa"),
        PresetPlayer::new("cddea7f7", "Krudo"),
    ]
}

//! Joined media row from the sound archive

/// Format marker of playable recordings
pub const PLAYABLE_FORMAT: &str = "audio/mp3";

/// Caption prefix of spectrogram images
pub const SPECTROGRAM_CAPTION: &str = "Spectrogram";

/// One media file joined with its observation
///
/// Both recordings and their spectrogram images appear as candidates; they
/// share `observation_ref`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    /// Observation reference shared by a recording and its spectrogram
    pub observation_ref: String,
    pub format: Option<String>,
    pub access_uri: Option<String>,
    /// Free text holding the duration, e.g. `"Song, 12 s"`
    pub description: Option<String>,
    pub caption: Option<String>,
    pub rights_holder: Option<String>,
    pub rating: Option<i64>,
    /// Behavior label, shown as the recording type
    pub behavior: Option<String>,
    /// Present when other species are audible in the background
    pub associated_taxa: Option<String>,
    pub event_date: Option<String>,
    pub vernacular_name: Option<String>,
    /// Species-level scientific name (subspecies already truncated)
    pub scientific_name: Option<String>,
}

impl Candidate {
    pub fn is_playable(&self) -> bool {
        self.format.as_deref() == Some(PLAYABLE_FORMAT)
    }

    pub fn is_spectrogram(&self) -> bool {
        self.caption
            .as_deref()
            .is_some_and(|c| c.starts_with(SPECTROGRAM_CAPTION))
    }
}

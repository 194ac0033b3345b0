//! HTML fragments for the Sounds field

use super::Selected;

/// Render one recording: type label, credit, player and spectrogram
///
/// `?` is stripped from the type label; missing values render empty.
pub fn render_recording(selected: &Selected<'_>) -> String {
    let candidate = selected.candidate;
    let kind = candidate
        .behavior
        .as_deref()
        .map(|b| b.replace('?', ""))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="aud-w-txt"><div class="aud-type">{}</div>"#,
            r#"<div class="aud-credit">© {}</div>"#,
            r#"<audio controls="" controlslist="nodownload noplaybackrate">"#,
            r#"<source src="{}" type="audio/mpeg"></audio>"#,
            r#"<img src="{}"></div>"#,
        ),
        kind,
        candidate.rights_holder.as_deref().unwrap_or_default(),
        candidate.access_uri.as_deref().unwrap_or_default(),
        selected.spectrogram.unwrap_or_default(),
    )
}

/// Concatenated fragments, `None` when nothing was selected
pub fn render_sounds(selected: &[Selected<'_>]) -> Option<String> {
    if selected.is_empty() {
        return None;
    }
    Some(selected.iter().map(render_recording).collect())
}

use crate::stapi::character::CharacterRecord;

/// Renders a character as a fixed-order, human-readable text block.
pub fn format_character(character: &CharacterRecord) -> String {
    let species = character
        .species
        .iter()
        .map(|species| species.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        format!("Name: {}", character.name),
        format!("Species: {species}"),
        "Episodes:".to_string(),
    ];
    lines.extend(
        character
            .episodes
            .iter()
            .map(|episode| format!(" - {} - {}", episode.season_title, episode.title)),
    );
    lines.push("Movies:".to_string());
    lines.extend(
        character
            .movies
            .iter()
            .map(|movie| format!(" - {}", movie.title)),
    );

    lines.join("\n")
}

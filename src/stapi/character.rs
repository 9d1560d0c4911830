use serde::{Deserialize, Serialize};

use crate::errors::StapiError;
use crate::stapi::client::CharacterApi;
use crate::stapi::schema::{
    character_response_shape, decode_validated, validate, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: String,
    pub series_title: String,
    pub season_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
}

/// Validated character detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub species: Vec<Species>,
    pub performers: Vec<Performer>,
    pub episodes: Vec<Episode>,
    pub movies: Vec<Movie>,
}

/// Search hit; only the uid is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub uid: String,
}

#[derive(Debug, Deserialize)]
struct CharacterEnvelope {
    character: RawCharacter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCharacter {
    name: String,
    character_species: Vec<Species>,
    performers: Vec<Performer>,
    episodes: Vec<RawEpisode>,
    movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
struct RawEpisode {
    title: String,
    series: Titled,
    season: Titled,
}

#[derive(Debug, Deserialize)]
struct Titled {
    title: String,
}

impl From<RawCharacter> for CharacterRecord {
    fn from(raw: RawCharacter) -> Self {
        Self {
            name: raw.name,
            species: raw.character_species,
            performers: raw.performers,
            episodes: raw
                .episodes
                .into_iter()
                .map(|episode| Episode {
                    title: episode.title,
                    series_title: episode.series.title,
                    season_title: episode.season.title,
                })
                .collect(),
            movies: raw.movies,
        }
    }
}

/// Validates a `GET /character` body into a [`CharacterRecord`].
pub fn parse_character_response(
    body: &serde_json::Value,
) -> Result<CharacterRecord, ValidationError> {
    let validated = validate(&character_response_shape(), body)?;
    let envelope: CharacterEnvelope = decode_validated(validated)?;

    Ok(envelope.character.into())
}

/// Fetches and validates one character. Every call hits the API.
pub async fn fetch_character(
    api: &dyn CharacterApi,
    uid: &str,
) -> Result<CharacterRecord, StapiError> {
    let body = api.fetch_character(uid).await?;
    Ok(parse_character_response(&body)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::stapi::schema::ValidationErrorKind;

    pub(crate) fn character_body(name: &str, species: Value) -> Value {
        json!({
            "character": {
                "uid": "CHMA0000187912",
                "name": name,
                "gender": "M",
                "characterSpecies": species,
                "performers": [{"uid": "PEMA0000001", "name": "Patrick Stewart"}],
                "episodes": [{
                    "uid": "EPMA0000000001",
                    "title": "Encounter at Farpoint",
                    "series": {"uid": "SEMA0000000002", "title": "Star Trek: The Next Generation"},
                    "season": {"uid": "SAMA0000000001", "title": "TNG Season 1"}
                }],
                "movies": [{"uid": "MOMA0000000007", "title": "Star Trek Generations"}]
            }
        })
    }

    struct StaticApi(Value);

    #[async_trait]
    impl CharacterApi for StaticApi {
        async fn fetch_character(&self, _uid: &str) -> Result<Value, StapiError> {
            Ok(self.0.clone())
        }

        async fn search_characters(&self, _name: &str) -> Result<Value, StapiError> {
            Ok(json!({"characters": []}))
        }
    }

    #[test]
    fn bare_species_object_becomes_sequence() {
        let record =
            parse_character_response(&character_body("Jean-Luc Picard", json!({"name": "Human"})))
                .expect("valid record");

        assert_eq!(
            record.species,
            vec![Species {
                name: "Human".to_string()
            }]
        );
    }

    #[test]
    fn species_array_is_kept_in_order() {
        let record = parse_character_response(&character_body(
            "Spock",
            json!([{"name": "Vulcan"}, {"name": "Human"}]),
        ))
        .expect("valid record");

        let names: Vec<_> = record.species.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Vulcan", "Human"]);
    }

    #[test]
    fn flattens_episode_series_and_season() {
        let record =
            parse_character_response(&character_body("Jean-Luc Picard", json!([])))
                .expect("valid record");

        assert_eq!(
            record.episodes,
            vec![Episode {
                title: "Encounter at Farpoint".to_string(),
                series_title: "Star Trek: The Next Generation".to_string(),
                season_title: "TNG Season 1".to_string(),
            }]
        );
        assert_eq!(record.performers[0].name, "Patrick Stewart");
        assert_eq!(record.movies[0].title, "Star Trek Generations");
    }

    #[test]
    fn serializes_with_camel_case_episode_fields() {
        let record =
            parse_character_response(&character_body("Jean-Luc Picard", json!({"name": "Human"})))
                .expect("valid record");

        let serialized = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(serialized["species"], json!([{"name": "Human"}]));
        assert_eq!(serialized["episodes"][0]["seasonTitle"], "TNG Season 1");
        assert_eq!(
            serialized["episodes"][0]["seriesTitle"],
            "Star Trek: The Next Generation"
        );
        assert!(serialized.get("characterSpecies").is_none());
    }

    #[test]
    fn missing_name_is_validation_error() {
        let mut body = character_body("Spock", json!([]));
        body["character"]
            .as_object_mut()
            .expect("character object")
            .remove("name");

        let err = parse_character_response(&body).expect_err("name required");
        assert_eq!(err.path, "$.character.name");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[tokio::test]
    async fn fetch_character_surfaces_validation_failure() {
        let api = StaticApi(json!({"error": "not found"}));

        let err = fetch_character(&api, "CHMA0000000000")
            .await
            .expect_err("missing envelope");

        assert!(matches!(err, StapiError::Validation(_)));
    }

    #[tokio::test]
    async fn fetch_character_returns_record() {
        let api = StaticApi(character_body("Jean-Luc Picard", json!({"name": "Human"})));

        let record = fetch_character(&api, "CHMA0000187912")
            .await
            .expect("valid record");

        assert_eq!(record.name, "Jean-Luc Picard");
        assert_eq!(record.species.len(), 1);
    }
}

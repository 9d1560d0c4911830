use futures::future::join_all;
use serde::Deserialize;
use tracing::info;

use crate::errors::StapiError;
use crate::stapi::character::{fetch_character, CharacterRecord, SearchCandidate};
use crate::stapi::client::CharacterApi;
use crate::stapi::schema::{decode_validated, search_response_shape, validate};

pub const MAX_SEARCH_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Every candidate STAPI returned, before the detail cap.
    pub candidates: Vec<SearchCandidate>,
    /// Details for the first [`MAX_SEARCH_CANDIDATES`] candidates, in API order.
    pub characters: Vec<CharacterRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    characters: Vec<SearchCandidate>,
}

pub async fn search_candidates(
    api: &dyn CharacterApi,
    name: &str,
) -> Result<Vec<SearchCandidate>, StapiError> {
    let body = api.search_characters(name).await?;
    let validated = validate(&search_response_shape(), &body)?;
    let envelope: SearchEnvelope = decode_validated(validated)?;

    Ok(envelope.characters)
}

/// Fetches details for the leading candidates concurrently.
///
/// All fetches run to completion before the result is decided; the first
/// failure in candidate order fails the whole batch.
pub async fn fetch_details(
    api: &dyn CharacterApi,
    candidates: &[SearchCandidate],
) -> Result<Vec<CharacterRecord>, StapiError> {
    let selected = &candidates[..candidates.len().min(MAX_SEARCH_CANDIDATES)];

    let results = join_all(
        selected
            .iter()
            .map(|candidate| fetch_character(api, &candidate.uid)),
    )
    .await;

    selected
        .iter()
        .zip(results)
        .map(|(candidate, result)| {
            result.map_err(|err| StapiError::Aggregation {
                uid: candidate.uid.clone(),
                source: Box::new(err),
            })
        })
        .collect()
}

pub async fn search_characters(
    api: &dyn CharacterApi,
    name: &str,
) -> Result<SearchOutcome, StapiError> {
    info!(name, "searching for characters");

    let candidates = search_candidates(api, name).await?;
    let characters = fetch_details(api, &candidates).await?;

    info!(
        name,
        total = candidates.len(),
        fetched = characters.len(),
        "character search complete"
    );

    Ok(SearchOutcome {
        candidates,
        characters,
    })
}

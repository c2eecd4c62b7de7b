use std::fmt::Write;

use crate::types::{Mode, Track};

/// Upper bound on how many tracks a single request may recommend
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Ratings at or above this land in the high bucket
pub const HIGH_RATING_MIN: u8 = 7;

/// Ratings at or below this land in the low bucket
pub const LOW_RATING_MAX: u8 = 4;

/// Rated tracks partitioned by preference strength.
///
/// Ratings 5-6 and missing ratings belong to neither bucket.
#[derive(Debug, Default)]
pub struct RatingBuckets<'a> {
    pub high: Vec<&'a Track>,
    pub low: Vec<&'a Track>,
}

/// Split rated tracks into high and low buckets, preserving input order
pub fn rating_buckets(rated: &[Track]) -> RatingBuckets<'_> {
    let mut buckets = RatingBuckets::default();
    for track in rated {
        match track.rating {
            Some(r) if r >= HIGH_RATING_MIN => buckets.high.push(track),
            Some(r) if r <= LOW_RATING_MAX => buckets.low.push(track),
            _ => {}
        }
    }
    buckets
}

/// Build the recommendation prompt for the given mode.
///
/// The candidate list is always rendered as `"{index}. {name}"` lines in the
/// order of `unrated`, so indices returned by the model resolve against the
/// same slice in [`crate::parsing::interpret`].
pub fn build_prompt(rated: &[Track], unrated: &[Track], mode: Mode) -> String {
    let candidates = numbered_candidates(unrated);
    let instructions = response_instructions();

    match mode {
        Mode::Rating => {
            let buckets = rating_buckets(rated);
            format!(
                r#"You are a music recommendation assistant. Based on the user's song ratings, recommend songs they are likely to enjoy.

Songs the user rated highly (7-10):
{high}
Songs the user rated poorly (1-4):
{low}
Available songs to choose from:
{candidates}
Look for similarities in artist, genre, song title and musical characteristics to the highly rated songs, and steer away from anything resembling the poorly rated ones.

{instructions}"#,
                high = rated_with_scores(&buckets.high),
                low = rated_with_scores(&buckets.low),
            )
        }
        Mode::Audio => format!(
            r#"You are an audio analysis expert. The user has rated these songs:
{rated}
Available songs to choose from:
{candidates}
Infer the sonic characteristics of the rated songs from their titles and artists: instrumentation, production style, vocal delivery, mixing and overall sound texture. Recommend the available songs whose sound best matches.

{instructions}"#,
            rated = rated_names(rated),
        ),
        Mode::Listening => format!(
            r#"You are a listening behavior analyst. The user has rated these songs:
{rated}
Available songs to choose from:
{candidates}
Consider listening patterns: which songs the user would likely replay, how engaged they would stay, and which songs fit naturally into the same listening sessions as the rated ones.

{instructions}"#,
            rated = rated_names(rated),
        ),
        Mode::Genre => format!(
            r#"You are a music genre specialist. The user has rated these songs:
{rated}
Available songs to choose from:
{candidates}
Identify the genres and subgenres of the rated songs, the network of related artists and collaborators, and the cultural scenes they come from. Recommend the available songs that belong to the same genre space.

{instructions}"#,
            rated = rated_names(rated),
        ),
        Mode::Tempo => format!(
            r#"You are a music tempo and energy analyst. The user has rated these songs:
{rated}
Available songs to choose from:
{candidates}
Estimate the tempo, energy level and mood of the rated songs. Recommend the available songs with a matching pace, intensity and emotional tone.

{instructions}"#,
            rated = rated_names(rated),
        ),
        Mode::Hybrid => {
            let buckets = rating_buckets(rated);
            let mut prompt = format!(
                "You are an advanced music recommendation system combining several analysis methods.\n\nSongs the user rated highly (7-10):\n{}",
                rated_with_scores(&buckets.high)
            );
            if !buckets.low.is_empty() {
                let _ = write!(
                    prompt,
                    "\nSongs the user rated poorly (1-4):\n{}",
                    rated_with_scores(&buckets.low)
                );
            }
            let _ = write!(
                prompt,
                r#"
Available songs to choose from:
{candidates}
Perform a comprehensive analysis that combines:
1. Rating patterns: similarity to the highly rated songs
2. Audio characteristics: instrumentation, production and sound texture
3. Listening behavior: replay value and session fit
4. Genre relationships: genres, related artists and scenes
5. Tempo and energy: pace, intensity and mood

Synthesize all of these signals into a single set of recommendations.

{instructions}"#
            );
            prompt
        }
    }
}

/// Shared closing instructions: count cap and the JSON-only reply format
fn response_instructions() -> String {
    format!(
        "Recommend up to {MAX_RECOMMENDATIONS} songs. Respond with ONLY a JSON array of the song numbers from the available list, for example: [1, 3, 7, 12, 15]. Do not include any other text."
    )
}

fn numbered_candidates(unrated: &[Track]) -> String {
    let mut out = String::new();
    for (i, track) in unrated.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, track.name);
    }
    out
}

fn rated_names(rated: &[Track]) -> String {
    let mut out = String::new();
    for track in rated {
        let _ = writeln!(out, "- {}", track.name);
    }
    out
}

fn rated_with_scores(tracks: &[&Track]) -> String {
    let mut out = String::new();
    for track in tracks {
        match track.rating {
            Some(r) => {
                let _ = writeln!(out, "- {} ({}/10)", track.name, r);
            }
            None => {
                let _ = writeln!(out, "- {}", track.name);
            }
        }
    }
    out
}

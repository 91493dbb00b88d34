use crate::{profile::RawProfile, Category};

const WEDDING_KEYWORDS: [&str; 6] = [
    "wedding",
    "bridal",
    "bride",
    "engaged",
    "ceremony",
    "reception",
];

const LOCATION_KEYWORDS: [&str; 10] = [
    "dallas",
    "houston",
    "austin",
    "nyc",
    "new york",
    "los angeles",
    "chicago",
    "atlanta",
    "miami",
    "dfw",
];

const BOOKING_KEYWORDS: [&str; 6] = [
    "booking",
    "book now",
    "dm for",
    "contact",
    "available",
    "inquiries",
];

const MAX_TERM_POINTS: u8 = 3;
const MAX_BIO_POINTS: u8 = 4;
const MAX_SCORE: u8 = 10;

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn bio_points(bio: &str, category: Category) -> u8 {
    let bio = bio.to_lowercase();

    let term_hits = category
        .business_terms()
        .iter()
        .filter(|term| bio.contains(*term) || bio.contains(&term.replace(' ', "")))
        .count();
    let mut points = u8::try_from(term_hits)
        .unwrap_or(u8::MAX)
        .min(MAX_TERM_POINTS);

    if contains_any(&bio, &WEDDING_KEYWORDS) {
        points += 1;
    }
    if contains_any(&bio, &LOCATION_KEYWORDS) {
        points += 1;
    }
    if contains_any(&bio, &BOOKING_KEYWORDS) {
        points += 1;
    }

    points.min(MAX_BIO_POINTS)
}

/// Scores a profile from 0 to 10.
///
/// Bio keywords give at most 4 points, audience size 2, activity 2 and
/// business signals (external link, verified or business account) 2.
pub fn quality_score(profile: &RawProfile, category: Category) -> u8 {
    let mut score = bio_points(profile.bio(), category);

    let followers = profile.followers();
    if followers > 500 {
        score += 1;
    }
    if followers > 2000 {
        score += 1;
    }

    let posts = profile.posts();
    if posts > 30 {
        score += 1;
    }
    if posts > 100 {
        score += 1;
    }

    if profile.external_url().is_some() {
        score += 1;
    }
    if profile.is_verified() || profile.is_business_account() {
        score += 1;
    }

    score.min(MAX_SCORE)
}

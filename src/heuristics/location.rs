use crate::markets;
use lazy_regex::regex;

const STATE_NAMES: [(&str, &str); 24] = [
    ("CA", "california"),
    ("NY", "new york"),
    ("TX", "texas"),
    ("FL", "florida"),
    ("IL", "illinois"),
    ("PA", "pennsylvania"),
    ("OH", "ohio"),
    ("GA", "georgia"),
    ("NC", "north carolina"),
    ("SC", "south carolina"),
    ("MI", "michigan"),
    ("WA", "washington"),
    ("AZ", "arizona"),
    ("MA", "massachusetts"),
    ("TN", "tennessee"),
    ("IN", "indiana"),
    ("MO", "missouri"),
    ("MD", "maryland"),
    ("WI", "wisconsin"),
    ("CO", "colorado"),
    ("MN", "minnesota"),
    ("OR", "oregon"),
    ("NV", "nevada"),
    ("VA", "virginia"),
];

fn state_code_for_name(name: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
}

/// Lower-case state name for a USPS code, e.g. "TX" -> "texas".
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name)| *name)
}

fn canonical_city(matched: &str) -> Option<&'static str> {
    let lower = matched.to_lowercase();
    let lower = regex!(r"\s+").replace_all(&lower, " ");
    let city = match &*lower {
        "new york city" | "new york" | "nyc" => "New York",
        "los angeles" => "Los Angeles",
        "san antonio" => "San Antonio",
        "san diego" => "San Diego",
        "san francisco" => "San Francisco",
        "san jose" => "San Jose",
        "fort worth" => "Fort Worth",
        "fort lauderdale" => "Fort Lauderdale",
        "las vegas" => "Las Vegas",
        "kansas city" => "Kansas City",
        "st. louis" | "st louis" | "saint louis" => "St. Louis",
        "dallas" | "dfw" => "Dallas",
        "houston" | "htx" => "Houston",
        "austin" | "atx" => "Austin",
        "chicago" => "Chicago",
        "miami" => "Miami",
        "boston" => "Boston",
        "seattle" => "Seattle",
        "nashville" => "Nashville",
        "denver" => "Denver",
        "atlanta" => "Atlanta",
        "phoenix" => "Phoenix",
        "philadelphia" => "Philadelphia",
        "charlotte" => "Charlotte",
        "portland" => "Portland",
        "orlando" => "Orlando",
        "plano" => "Plano",
        "arlington" => "Arlington",
        "sacramento" => "Sacramento",
        "tampa" => "Tampa",
        "jacksonville" => "Jacksonville",
        "columbus" => "Columbus",
        "indianapolis" => "Indianapolis",
        "milwaukee" => "Milwaukee",
        "minneapolis" => "Minneapolis",
        "raleigh" => "Raleigh",
        "richmond" => "Richmond",
        "baltimore" => "Baltimore",
        "charleston" => "Charleston",
        "savannah" => "Savannah",
        _ => return None,
    };
    Some(city)
}

fn extract_state(bio: &str) -> Option<String> {
    // "Dallas, TX" is the most reliable form, then a spelled-out state,
    // then a bare upper-case code anywhere.
    let after_comma = regex!(
        r",\s*(TX|CA|NY|FL|IL|PA|OH|GA|NC|SC|MI|WA|AZ|MA|TN|IN|MO|MD|WI|CO|MN|OR|NV|VA)\b"
    );
    if let Some(caps) = after_comma.captures(bio) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    let names = regex!(
        r"(?i)\b(north carolina|south carolina|new york|california|texas|florida|illinois|pennsylvania|ohio|georgia|michigan|washington|arizona|massachusetts|tennessee|indiana|missouri|maryland|wisconsin|colorado|minnesota|oregon|nevada|virginia)\b"
    );
    if let Some(code) = names
        .find(bio)
        .and_then(|m| state_code_for_name(m.as_str()))
    {
        return Some(code.to_string());
    }

    // IN, CO and OR read as words in upper-case bios; only the comma form
    // above accepts them.
    regex!(r"\b(TX|CA|NY|FL|IL|PA|OH|GA|NC|SC|MI|WA|AZ|MA|TN|MO|MD|WI|MN|NV|VA)\b")
        .captures(bio)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_city(bio: &str) -> Option<String> {
    let cities = regex!(
        r"(?i)\b(new york city|new york|nyc|los angeles|san antonio|san diego|san francisco|san jose|fort worth|fort lauderdale|las vegas|kansas city|st\.? louis|saint louis|dallas|dfw|houston|htx|austin|atx|chicago|miami|boston|seattle|nashville|denver|atlanta|phoenix|philadelphia|charlotte|portland|orlando|plano|arlington|sacramento|tampa|jacksonville|columbus|indianapolis|milwaukee|minneapolis|raleigh|richmond|baltimore|charleston|savannah)\b"
    );
    if let Some(city) = cities.find(bio).and_then(|m| canonical_city(m.as_str())) {
        return Some(city.to_string());
    }

    // Lower-case "la" is far too common to match case-insensitively.
    regex!(r"\bLA\b")
        .is_match(bio)
        .then(|| "Los Angeles".to_string())
}

/// Finds a (city, state) pair in free text.
///
/// When only a known market city is found the state is filled in from
/// the market table.
pub fn extract_location(bio: &str) -> (Option<String>, Option<String>) {
    let city = extract_city(bio);
    let state = extract_state(bio).or_else(|| {
        city.as_deref()
            .and_then(markets::state_for_city)
            .map(ToString::to_string)
    });
    (city, state)
}

use clap::ValueEnum;

pub type Market = (&'static str, &'static str);

pub const MAJOR_MARKETS: [Market; 21] = [
    ("Dallas", "TX"),
    ("Houston", "TX"),
    ("Austin", "TX"),
    ("San Antonio", "TX"),
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Phoenix", "AZ"),
    ("Philadelphia", "PA"),
    ("San Diego", "CA"),
    ("San Francisco", "CA"),
    ("Boston", "MA"),
    ("Atlanta", "GA"),
    ("Miami", "FL"),
    ("Seattle", "WA"),
    ("Denver", "CO"),
    ("Nashville", "TN"),
    ("Portland", "OR"),
    ("Las Vegas", "NV"),
    ("Charlotte", "NC"),
    ("Orlando", "FL"),
];

pub const SECONDARY_MARKETS: [Market; 18] = [
    ("Fort Worth", "TX"),
    ("Plano", "TX"),
    ("Arlington", "TX"),
    ("Sacramento", "CA"),
    ("San Jose", "CA"),
    ("Fresno", "CA"),
    ("Tampa", "FL"),
    ("Jacksonville", "FL"),
    ("Fort Lauderdale", "FL"),
    ("Columbus", "OH"),
    ("Indianapolis", "IN"),
    ("Milwaukee", "WI"),
    ("Kansas City", "MO"),
    ("St. Louis", "MO"),
    ("Minneapolis", "MN"),
    ("Raleigh", "NC"),
    ("Richmond", "VA"),
    ("Baltimore", "MD"),
];

/// Cities the coverage audit measures against.
pub const TOP_WEDDING_MARKETS: [Market; 20] = [
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Miami", "FL"),
    ("San Francisco", "CA"),
    ("Boston", "MA"),
    ("Seattle", "WA"),
    ("Austin", "TX"),
    ("Nashville", "TN"),
    ("Denver", "CO"),
    ("Atlanta", "GA"),
    ("Dallas", "TX"),
    ("Houston", "TX"),
    ("San Diego", "CA"),
    ("Philadelphia", "PA"),
    ("Phoenix", "AZ"),
    ("Charleston", "SC"),
    ("Savannah", "GA"),
    ("Portland", "OR"),
    ("Las Vegas", "NV"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn markets(&self) -> Vec<Market> {
        match self {
            Priority::High => MAJOR_MARKETS[..10].to_vec(),
            Priority::Medium => SECONDARY_MARKETS[..10].to_vec(),
            Priority::Low => MAJOR_MARKETS
                .iter()
                .chain(SECONDARY_MARKETS.iter())
                .skip(20)
                .take(10)
                .copied()
                .collect(),
        }
    }
}

pub fn state_for_city(city: &str) -> Option<&'static str> {
    MAJOR_MARKETS
        .iter()
        .chain(SECONDARY_MARKETS.iter())
        .chain(TOP_WEDDING_MARKETS.iter())
        .find(|(c, _)| c.eq_ignore_ascii_case(city))
        .map(|(_, s)| *s)
}

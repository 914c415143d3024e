/// Platforms the website tracks release dates for.
///
/// Centralizes the canonical label shown on the site, the listing slug used
/// by the release scraper, and the aliases accepted from free text, so that
/// "Switch", "switch" and "Nintendo Switch" all end up as `NS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Pc,
    Ps5,
    Ps4,
    XboxSeries,
    XboxOne,
    Switch,
    Switch2,
    Ios,
    Android,
}

/// All platform variants in listing order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::Pc,
    Platform::Ps5,
    Platform::XboxSeries,
    Platform::Ps4,
    Platform::Switch,
    Platform::Switch2,
    Platform::XboxOne,
    Platform::Ios,
    Platform::Android,
];

impl Platform {
    /// Canonical label stored in the data files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Ps5 => "PS5",
            Self::Ps4 => "PS4",
            Self::XboxSeries => "Xbox Series X|S",
            Self::XboxOne => "Xbox One",
            Self::Switch => "NS",
            Self::Switch2 => "NS2",
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }

    /// Slug used in release listing URLs (`.../release/<slug>_<YYYYMM>/`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Ps5 => "ps5",
            Self::Ps4 => "ps4",
            Self::XboxSeries => "xsx",
            Self::XboxOne => "xboxone",
            Self::Switch => "switch",
            Self::Switch2 => "switch2",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    /// All accepted names for this platform.
    ///
    /// Matching ignores case and whitespace, so "Xbox Series X|S" and
    /// "xboxseriesx|s" are the same alias.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Pc => &["pc", "windows", "win", "microsoft windows"],
            Self::Ps5 => &["ps5", "playstation 5", "playstation5"],
            Self::Ps4 => &["ps4", "playstation 4", "playstation4"],
            Self::XboxSeries => &[
                "xsx",
                "xbox series x|s",
                "xbox series x/s",
                "xbox series x",
                "xbox series s",
                "xbox series",
                "xss",
            ],
            Self::XboxOne => &["xboxone", "xbox one", "xb1", "xone"],
            Self::Switch => &["switch", "ns", "nsw", "nintendo switch"],
            Self::Switch2 => &["switch2", "ns2", "switch 2", "nintendo switch 2"],
            Self::Ios => &["ios", "iphone", "ipad"],
            Self::Android => &["android"],
        }
    }

    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from its label, slug, or any alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = compact(s);
        for &platform in ALL_PLATFORMS {
            if compact(platform.label()) == key || platform.slug() == key {
                return Ok(platform);
            }
            if platform.aliases().iter().any(|alias| compact(alias) == key) {
                return Ok(platform);
            }
        }
        Err(PlatformParseError(s.to_string()))
    }
}

/// Map a raw platform token to its canonical label.
///
/// Unrecognized tokens are returned trimmed but otherwise untouched.
pub fn normalize_platform(raw: &str) -> String {
    let token = raw.trim();
    match token.parse::<Platform>() {
        Ok(platform) => platform.label().to_string(),
        Err(_) => token.to_string(),
    }
}

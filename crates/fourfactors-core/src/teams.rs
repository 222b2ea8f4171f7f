// NBA team name to three-letter code lookup.

use std::collections::HashMap;

/// Full franchise names as they appear in common exports, with their codes.
/// The Clippers appear under both spellings.
pub const NBA_TEAMS: &[(&str, &str)] = &[
    ("Atlanta Hawks", "ATL"),
    ("Boston Celtics", "BOS"),
    ("Brooklyn Nets", "BKN"),
    ("Charlotte Hornets", "CHA"),
    ("Chicago Bulls", "CHI"),
    ("Cleveland Cavaliers", "CLE"),
    ("Dallas Mavericks", "DAL"),
    ("Denver Nuggets", "DEN"),
    ("Detroit Pistons", "DET"),
    ("Golden State Warriors", "GSW"),
    ("Houston Rockets", "HOU"),
    ("Indiana Pacers", "IND"),
    ("LA Clippers", "LAC"),
    ("Los Angeles Clippers", "LAC"),
    ("Los Angeles Lakers", "LAL"),
    ("Memphis Grizzlies", "MEM"),
    ("Miami Heat", "MIA"),
    ("Milwaukee Bucks", "MIL"),
    ("Minnesota Timberwolves", "MIN"),
    ("New Orleans Pelicans", "NOP"),
    ("New York Knicks", "NYK"),
    ("Oklahoma City Thunder", "OKC"),
    ("Orlando Magic", "ORL"),
    ("Philadelphia 76ers", "PHI"),
    ("Phoenix Suns", "PHX"),
    ("Portland Trail Blazers", "POR"),
    ("Sacramento Kings", "SAC"),
    ("San Antonio Spurs", "SAS"),
    ("Toronto Raptors", "TOR"),
    ("Utah Jazz", "UTA"),
    ("Washington Wizards", "WAS"),
];

/// Immutable name-to-code map built once from a static table.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    codes: HashMap<&'static str, &'static str>,
}

impl TeamDirectory {
    pub fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            codes: entries.iter().copied().collect(),
        }
    }

    /// Directory for the 30 NBA franchises.
    pub fn nba() -> Self {
        Self::new(NBA_TEAMS)
    }

    /// Code for a known team name.
    pub fn code(&self, name: &str) -> Option<&'static str> {
        self.codes.get(name.trim()).copied()
    }

    /// Code for a known name; anything else passes through trimmed.
    pub fn code_or_passthrough(&self, name: &str) -> String {
        match self.code(name) {
            Some(code) => code.to_string(),
            None => name.trim().to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::nba()
    }
}

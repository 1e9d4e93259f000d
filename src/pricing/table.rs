//! Closed answer sets and the static price grid

use std::fmt;
use std::str::FromStr;

/// Supported cities. Matching against user input is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Vilnius,
    Kaunas,
    Klaipeda,
}

impl City {
    pub const ALL: [City; 3] = [City::Vilnius, City::Kaunas, City::Klaipeda];

    pub fn name(self) -> &'static str {
        match self {
            City::Vilnius => "Vilnius",
            City::Kaunas => "Kaunas",
            City::Klaipeda => "Klaipėda",
        }
    }

    fn index(self) -> usize {
        match self {
            City::Vilnius => 0,
            City::Kaunas => 1,
            City::Klaipeda => 2,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when text is not one of the supported city names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCity;

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|city| city.name() == s)
            .ok_or(UnknownCity)
    }
}

/// Number of students attending one lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentCount {
    One,
    Two,
}

impl StudentCount {
    #[cfg(test)]
    pub const ALL: [StudentCount; 2] = [StudentCount::One, StudentCount::Two];

    /// Interpret a free-text answer. Anything mentioning `2` means two
    /// students, everything else means one.
    pub fn from_answer(text: &str) -> Self {
        if text.contains('2') {
            StudentCount::Two
        } else {
            StudentCount::One
        }
    }

    pub fn get(self) -> u32 {
        match self {
            StudentCount::One => 1,
            StudentCount::Two => 2,
        }
    }

    fn index(self) -> usize {
        match self {
            StudentCount::One => 0,
            StudentCount::Two => 1,
        }
    }
}

impl fmt::Display for StudentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Price tier selected from the full-month lesson forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    UpToThree,
    FourToFive,
    SixToSeven,
    Eight,
    NineOrMore,
}

impl Tier {
    #[cfg(test)]
    pub const ALL: [Tier; 5] = [
        Tier::UpToThree,
        Tier::FourToFive,
        Tier::SixToSeven,
        Tier::Eight,
        Tier::NineOrMore,
    ];

    /// Bands are closed and non-overlapping, checked from the top down.
    pub fn for_forecast(forecast: u64) -> Self {
        match forecast {
            9.. => Tier::NineOrMore,
            8 => Tier::Eight,
            6..=7 => Tier::SixToSeven,
            4..=5 => Tier::FourToFive,
            _ => Tier::UpToThree,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::UpToThree => "1-3",
            Tier::FourToFive => "4-5",
            Tier::SixToSeven => "6-7",
            Tier::Eight => "8",
            Tier::NineOrMore => "9+",
        }
    }

    fn index(self) -> usize {
        match self {
            Tier::UpToThree => 0,
            Tier::FourToFive => 1,
            Tier::SixToSeven => 2,
            Tier::Eight => 3,
            Tier::NineOrMore => 4,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit prices in euros, indexed by city, then student count, then tier.
///
/// Every combination of the closed enums has an entry, so lookups are total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    grid: [[[u32; 5]; 2]; 3],
}

impl PriceTable {
    pub const STANDARD: PriceTable = PriceTable {
        grid: [
            // Vilnius
            [[50, 40, 35, 33, 30], [65, 55, 50, 45, 40]],
            // Kaunas
            [[40, 35, 32, 30, 28], [55, 50, 45, 40, 35]],
            // Klaipėda
            [[35, 30, 27, 25, 23], [50, 45, 40, 35, 30]],
        ],
    };

    pub fn unit_price(&self, city: City, students: StudentCount, tier: Tier) -> u32 {
        self.grid[city.index()][students.index()][tier.index()]
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

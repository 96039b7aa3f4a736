//! YouTube video categories.

use std::fmt;
use std::str::FromStr;

/// A YouTube video category.
///
/// The numeric ids are assigned by YouTube and are what the API expects in
/// `snippet.categoryId`. YouTube's own table lists "Comedy" twice (23 and 34); only 23 is
/// represented here so that every label maps to exactly one id.
///
/// See: <https://developers.google.com/youtube/v3/docs/videoCategories/list>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    FilmAnimation,
    AutosVehicles,
    Music,
    PetsAnimals,
    Sports,
    ShortMovies,
    TravelEvents,
    Gaming,
    Videoblogging,
    PeopleBlogs,
    Comedy,
    Entertainment,
    NewsPolitics,
    HowtoStyle,
    Education,
    #[default]
    ScienceTechnology,
    NonprofitsActivism,
    Movies,
    AnimeAnimation,
    ActionAdventure,
    Classics,
    Documentary,
    Drama,
    Family,
    Foreign,
    Horror,
    SciFiFantasy,
    Thriller,
    Shorts,
    Shows,
    Trailers,
}

impl Category {
    pub const ALL: [Category; 31] = [
        Self::FilmAnimation,
        Self::AutosVehicles,
        Self::Music,
        Self::PetsAnimals,
        Self::Sports,
        Self::ShortMovies,
        Self::TravelEvents,
        Self::Gaming,
        Self::Videoblogging,
        Self::PeopleBlogs,
        Self::Comedy,
        Self::Entertainment,
        Self::NewsPolitics,
        Self::HowtoStyle,
        Self::Education,
        Self::ScienceTechnology,
        Self::NonprofitsActivism,
        Self::Movies,
        Self::AnimeAnimation,
        Self::ActionAdventure,
        Self::Classics,
        Self::Documentary,
        Self::Drama,
        Self::Family,
        Self::Foreign,
        Self::Horror,
        Self::SciFiFantasy,
        Self::Thriller,
        Self::Shorts,
        Self::Shows,
        Self::Trailers,
    ];

    /// The platform-assigned category id.
    pub const fn id(self) -> u32 {
        match self {
            Self::FilmAnimation => 1,
            Self::AutosVehicles => 2,
            Self::Music => 10,
            Self::PetsAnimals => 15,
            Self::Sports => 17,
            Self::ShortMovies => 18,
            Self::TravelEvents => 19,
            Self::Gaming => 20,
            Self::Videoblogging => 21,
            Self::PeopleBlogs => 22,
            Self::Comedy => 23,
            Self::Entertainment => 24,
            Self::NewsPolitics => 25,
            Self::HowtoStyle => 26,
            Self::Education => 27,
            Self::ScienceTechnology => 28,
            Self::NonprofitsActivism => 29,
            Self::Movies => 30,
            Self::AnimeAnimation => 31,
            Self::ActionAdventure => 32,
            Self::Classics => 33,
            Self::Documentary => 35,
            Self::Drama => 36,
            Self::Family => 37,
            Self::Foreign => 38,
            Self::Horror => 39,
            Self::SciFiFantasy => 40,
            Self::Thriller => 41,
            Self::Shorts => 42,
            Self::Shows => 43,
            Self::Trailers => 44,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FilmAnimation => "FilmAnimation",
            Self::AutosVehicles => "AutosVehicles",
            Self::Music => "Music",
            Self::PetsAnimals => "PetsAnimals",
            Self::Sports => "Sports",
            Self::ShortMovies => "ShortMovies",
            Self::TravelEvents => "TravelEvents",
            Self::Gaming => "Gaming",
            Self::Videoblogging => "Videoblogging",
            Self::PeopleBlogs => "PeopleBlogs",
            Self::Comedy => "Comedy",
            Self::Entertainment => "Entertainment",
            Self::NewsPolitics => "NewsPolitics",
            Self::HowtoStyle => "HowtoStyle",
            Self::Education => "Education",
            Self::ScienceTechnology => "ScienceTechnology",
            Self::NonprofitsActivism => "NonprofitsActivism",
            Self::Movies => "Movies",
            Self::AnimeAnimation => "AnimeAnimation",
            Self::ActionAdventure => "ActionAdventure",
            Self::Classics => "Classics",
            Self::Documentary => "Documentary",
            Self::Drama => "Drama",
            Self::Family => "Family",
            Self::Foreign => "Foreign",
            Self::Horror => "Horror",
            Self::SciFiFantasy => "SciFiFantasy",
            Self::Thriller => "Thriller",
            Self::Shorts => "Shorts",
            Self::Shows => "Shows",
            Self::Trailers => "Trailers",
        }
    }

    /// Looks up a category by label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown video category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts either a label (`ScienceTechnology`) or a numeric id (`28`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .ok()
            .and_then(Self::from_id)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

use crate::models::{Gender, LocationScope, Preferences, Profile};

/// Lower age bound used when preferences leave it unset
pub const DEFAULT_MIN_AGE: i32 = 18;
/// Upper age bound used when preferences leave it unset
pub const DEFAULT_MAX_AGE: i32 = 100;

/// Inclusive age bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl AgeRange {
    #[inline]
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_AGE,
            max: DEFAULT_MAX_AGE,
        }
    }
}

/// Location agreement required of a candidate.
///
/// Each component is only constrained when the requester's own profile has
/// a value for it, so a requester without a city still matches on state and
/// country under `City`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    Any,
    City {
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
    },
    State {
        state: Option<String>,
        country: Option<String>,
    },
    Country {
        country: Option<String>,
    },
}

impl LocationFilter {
    /// Derive the filter for a scope from the requester's profile
    pub fn for_scope(scope: LocationScope, origin: &Profile) -> Self {
        match scope {
            LocationScope::SameCity => LocationFilter::City {
                city: origin.city.clone(),
                state: origin.state.clone(),
                country: origin.country.clone(),
            },
            LocationScope::SameState => LocationFilter::State {
                state: origin.state.clone(),
                country: origin.country.clone(),
            },
            LocationScope::SameCountry => LocationFilter::Country {
                country: origin.country.clone(),
            },
            LocationScope::Any => LocationFilter::Any,
        }
    }

    pub fn city(&self) -> Option<&str> {
        match self {
            LocationFilter::City { city, .. } => city.as_deref(),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<&str> {
        match self {
            LocationFilter::City { state, .. } | LocationFilter::State { state, .. } => {
                state.as_deref()
            }
            _ => None,
        }
    }

    pub fn country(&self) -> Option<&str> {
        match self {
            LocationFilter::City { country, .. }
            | LocationFilter::State { country, .. }
            | LocationFilter::Country { country } => country.as_deref(),
            LocationFilter::Any => None,
        }
    }

    #[inline]
    pub fn matches(&self, profile: &Profile) -> bool {
        component_matches(self.city(), profile.city.as_deref())
            && component_matches(self.state(), profile.state.as_deref())
            && component_matches(self.country(), profile.country.as_deref())
    }
}

#[inline]
fn component_matches(required: Option<&str>, actual: Option<&str>) -> bool {
    match required {
        Some(required) => actual == Some(required),
        None => true,
    }
}

/// Inclusion filter applied to candidate profiles.
///
/// Both stores evaluate the same struct: Postgres renders it into SQL,
/// the in-memory store calls [`SuggestionFilter::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionFilter {
    /// `None` means every gender is acceptable
    pub genders: Option<Vec<Gender>>,
    pub age: AgeRange,
    pub location: LocationFilter,
}

impl SuggestionFilter {
    /// Build the filter for a requester from their stored preferences
    pub fn from_preferences(
        preferences: Option<&Preferences>,
        origin: &Profile,
        defaults: AgeRange,
    ) -> Self {
        let Some(prefs) = preferences else {
            return Self {
                genders: None,
                age: defaults,
                location: LocationFilter::Any,
            };
        };

        let genders = if prefs.preferred_genders.is_empty() {
            None
        } else {
            Some(prefs.preferred_genders.clone())
        };

        Self {
            genders,
            age: AgeRange {
                min: prefs.age_min.unwrap_or(defaults.min),
                max: prefs.age_max.unwrap_or(defaults.max),
            },
            location: LocationFilter::for_scope(prefs.location_scope, origin),
        }
    }

    /// Check whether a candidate profile passes every inclusion rule
    #[inline]
    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(genders) = &self.genders {
            if !genders.contains(&profile.gender) {
                return false;
            }
        }

        self.age.contains(profile.age) && self.location.matches(profile)
    }

    /// Gender names as stored, for query binding
    pub fn gender_names(&self) -> Option<Vec<String>> {
        self.genders
            .as_ref()
            .map(|g| g.iter().map(|g| g.as_str().to_string()).collect())
    }
}

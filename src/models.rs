use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::VkMatchError;
use crate::Result;

/// Wire format of VK birthdates (`D.M.YYYY`)
pub const BDATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a VK `bdate` string; year-less dates (`15.6`) are rejected
pub fn parse_bdate(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), BDATE_FORMAT)
        .map_err(|e| VkMatchError::Validation(format!("invalid birthdate {raw:?}: {e}")))
}

pub fn format_bdate(date: NaiveDate) -> String {
    date.format(BDATE_FORMAT).to_string()
}

/// Sex as encoded by VK (0 means "not specified" and has no variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum Sex {
    Female = 1,
    Male = 2,
}

impl Sex {
    pub fn from_vk(code: i64) -> Option<Self> {
        match code {
            1 => Some(Sex::Female),
            2 => Some(Sex::Male),
            _ => None,
        }
    }

    pub fn vk_code(self) -> i16 {
        self as i16
    }

    pub fn opposite(self) -> Self {
        match self {
            Sex::Female => Sex::Male,
            Sex::Male => Sex::Female,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub title: String,
}

/// A user profile as resolved from `users.get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birthdate: Option<NaiveDate>,
    pub city: Option<City>,
}

impl Profile {
    /// Birthdate and city present (sex is always present on a typed profile)
    pub fn is_complete(&self) -> bool {
        self.birthdate.is_some() && self.city.is_some()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birthdate.map(|date| date.year())
    }

    pub fn city_id(&self) -> Option<i64> {
        self.city.as_ref().map(|city| city.id)
    }
}

/// Derived search parameters for one seed profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub target_sex: Sex,
    pub age: u32,
    pub age_from: u32,
    pub age_to: u32,
    pub city_id: i64,
}

/// A profile accepted by the search stage, flattened for storage and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub sex: Sex,
    pub city_id: i64,
    pub city_title: String,
}

impl Candidate {
    /// Flatten a complete profile; incomplete profiles yield `None`
    pub fn from_profile(profile: &Profile) -> Option<Self> {
        let birthdate = profile.birthdate?;
        let city = profile.city.as_ref()?;
        Some(Self {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            birthdate,
            sex: profile.sex,
            city_id: city.id,
            city_title: city.title.clone(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn profile_url(&self) -> String {
        format!("https://vk.com/id{}", self.id)
    }
}

/// One photo with its largest rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub owner_id: i64,
    pub photo_id: i64,
    pub url: String,
    pub likes_count: u32,
    pub comments_count: u32,
    pub captured_at: DateTime<Utc>,
}

impl Photo {
    pub fn engagement_score(&self) -> u64 {
        u64::from(self.likes_count) + u64::from(self.comments_count)
    }

    /// Attachment reference accepted by messages.send
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.photo_id)
    }
}

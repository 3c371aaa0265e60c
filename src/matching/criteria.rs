//! Age computation and search criteria derivation

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Utc;

use crate::models::Profile;
use crate::models::SearchCriteria;

/// Full years between `birthdate` and `today`
///
/// One year is subtracted while this year's birthday (month, day) has not
/// been reached yet. A birthdate in the future gives zero.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Criteria for `seed` as of today
pub fn derive(seed: &Profile) -> Option<SearchCriteria> {
    derive_on(seed, Utc::now().date_naive())
}

/// Criteria for `seed` as of `today`; `None` without a birthdate or city
pub fn derive_on(seed: &Profile, today: NaiveDate) -> Option<SearchCriteria> {
    let birthdate = seed.birthdate?;
    let city_id = seed.city_id()?;
    let age = age_on(birthdate, today);

    Some(SearchCriteria {
        target_sex: seed.sex.opposite(),
        age,
        age_from: age.saturating_sub(1),
        age_to: age + 1,
        city_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;
    use crate::models::Sex;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn seed(birthdate: Option<NaiveDate>) -> Profile {
        Profile {
            id: 1,
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            sex: Sex::Male,
            birthdate,
            city: Some(City {
                id: 1,
                title: "X".to_string(),
            }),
        }
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(age_on(date(29, 2, 2000), date(28, 2, 2024)), 23);
        assert_eq!(age_on(date(29, 2, 2000), date(1, 3, 2024)), 24);
        assert_eq!(age_on(date(29, 2, 2000), date(29, 2, 2024)), 24);
    }

    #[test]
    fn test_age_on_birthday_and_future() {
        assert_eq!(age_on(date(15, 6, 1990), date(15, 6, 2020)), 30);
        assert_eq!(age_on(date(15, 6, 1990), date(14, 6, 2020)), 29);
        assert_eq!(age_on(date(1, 1, 2030), date(1, 1, 2020)), 0);
    }

    #[test]
    fn test_derive_window_and_opposite_sex() {
        let criteria = derive_on(&seed(Some(date(15, 6, 1990))), date(1, 7, 2024)).unwrap();
        assert_eq!(criteria.target_sex, Sex::Female);
        assert_eq!(criteria.age, 34);
        assert_eq!(criteria.age_from, 33);
        assert_eq!(criteria.age_to, 35);
        assert_eq!(criteria.city_id, 1);
    }

    #[test]
    fn test_derive_requires_birthdate_and_city() {
        assert!(derive(&seed(None)).is_none());

        let mut no_city = seed(Some(date(15, 6, 1990)));
        no_city.city = None;
        assert!(derive(&no_city).is_none());
    }
}

use chrono::NaiveDate;

use super::Database;
use crate::errors::VkMatchError;
use crate::models::Candidate;
use crate::models::Sex;
use crate::Result;

type ProfileRow = (i64, String, String, i16, NaiveDate, i64, String);

impl Database {
    /// Insert a candidate profile or refresh the stored one
    pub async fn upsert_match_profile(&self, candidate: &Candidate) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO match_profiles (
                vk_id, first_name, last_name, sex, birthdate, city_id, city_title, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (vk_id)
            DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                sex = EXCLUDED.sex,
                birthdate = EXCLUDED.birthdate,
                city_id = EXCLUDED.city_id,
                city_title = EXCLUDED.city_title,
                updated_at = NOW()
            ",
        )
        .bind(candidate.id)
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(candidate.sex.vk_code())
        .bind(candidate.birthdate)
        .bind(candidate.city_id)
        .bind(&candidate.city_title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a stored profile by VK id
    pub async fn get_match_profile(&self, vk_id: i64) -> Result<Option<Candidate>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r"
            SELECT vk_id, first_name, last_name, sex, birthdate, city_id, city_title
            FROM match_profiles
            WHERE vk_id = $1
            ",
        )
        .bind(vk_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(candidate_from_row).transpose()
    }
}

fn candidate_from_row(row: ProfileRow) -> Result<Candidate> {
    let (id, first_name, last_name, sex, birthdate, city_id, city_title) = row;
    let sex = Sex::from_vk(i64::from(sex)).ok_or_else(|| {
        VkMatchError::Validation(format!("stored profile {id} has invalid sex code {sex}"))
    })?;

    Ok(Candidate {
        id,
        first_name,
        last_name,
        birthdate,
        sex,
        city_id,
        city_title,
    })
}

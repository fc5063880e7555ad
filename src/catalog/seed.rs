//! Baseline catalog inserted at startup.

use sqlx::PgPool;

/// Categories and habits every instance starts with.
pub const DEFAULT_CATALOG: &[(&str, &[&str])] = &[
    (
        "Health & Wellness",
        &[
            "Drink 8 Glasses of Water",
            "Walk 2,000+ Steps",
            "Meditate for 10 Minutes",
            "Sleep Before 11 PM",
            "Do 15 Minutes of Exercise",
            "Avoid Sugar for a Day",
            "No Junk Food Today",
        ],
    ),
    (
        "Learning & Growth",
        &[
            "Read for 15–30 Minutes",
            "Watch an Educational Video",
            "Revise a Past Topic",
            "Listen to a Podcast",
            "Practice Mind Mapping",
            "Do 1 Page of Workbook",
            "Write Down a New Word",
        ],
    ),
    (
        "Productivity",
        &[
            "Plan Your Day",
            "Complete Top 3 Tasks",
            "Limit Social Media Time",
            "Set Tomorrow’s Agenda",
            "Organize Emails/Folders",
            "Track Your Screen Time",
            "Take 2 Short Breaks",
        ],
    ),
    (
        "Finance & Discipline",
        &[
            "Track Daily Expenses",
            "Review Monthly Budget",
            "Save ₹100 Today",
            "Don’t Order Food Online",
            "Use Cashback / Offers",
            "Set a Daily Spending Limit",
            "Use Cash Instead of UPI",
        ],
    ),
    (
        "Personal & Lifestyle",
        &[
            "No Screen 1 Hour Before Bed",
            "Take 1 Photo Daily",
            "Practice Gratitude",
            "Compliment Someone",
            "Say “No” to One Thing",
            "Smile at 3 People",
            "Clean 1 Small Area",
        ],
    ),
];

/// Insert the default categories and habits when absent.
///
/// Keyed on the partial unique indexes over predefined rows, so re-running
/// never creates duplicates.
pub async fn seed(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (category_name, habits) in DEFAULT_CATALOG {
        sqlx::query(
            r#"INSERT INTO categories (category_name, is_custom)
                VALUES ($1, FALSE)
                ON CONFLICT (category_name) WHERE NOT is_custom DO NOTHING"#,
        )
        .bind(*category_name)
        .execute(pool)
        .await?;

        let (category_id,): (i64,) = sqlx::query_as(
            r#"SELECT category_id FROM categories
                WHERE category_name = $1 AND NOT is_custom"#,
        )
        .bind(*category_name)
        .fetch_one(pool)
        .await?;

        for habit_name in *habits {
            sqlx::query(
                r#"INSERT INTO habits (category_id, habit_name, is_custom)
                    VALUES ($1, $2, FALSE)
                    ON CONFLICT (category_id, habit_name) WHERE NOT is_custom
                    DO NOTHING"#,
            )
            .bind(category_id)
            .bind(*habit_name)
            .execute(pool)
            .await?;
        }
    }

    tracing::info!("default categories and habits seeded");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(DEFAULT_CATALOG.len(), 5);
        for (_, habits) in DEFAULT_CATALOG {
            assert_eq!(habits.len(), 7);
        }
    }

    #[test]
    fn test_no_duplicate_names() {
        let mut categories: Vec<&str> =
            DEFAULT_CATALOG.iter().map(|(name, _)| *name).collect();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(categories.len(), DEFAULT_CATALOG.len());

        for (_, habits) in DEFAULT_CATALOG {
            let mut names = habits.to_vec();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), habits.len());
        }
    }

    #[sqlx::test]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_seed_is_idempotent(pool: PgPool) {
        seed(&pool).await.unwrap();
        seed(&pool).await.unwrap();

        let (categories,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories")
                .fetch_one(&pool)
                .await
                .unwrap();
        let (habits,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM habits")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(categories, 5);
        assert_eq!(habits, 35);
    }
}

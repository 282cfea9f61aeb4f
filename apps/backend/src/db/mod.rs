//! PostgreSQL card store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use study_core::{CardStore, DeckStore, StudyError};

use crate::error::{ApiError, Result};
use crate::models::*;

type StoreResult<T> = study_core::Result<T>;

const SELECT_CARDS: &str = r#"
    SELECT id, deck_id, question, answer, extra, correct, incorrect, lapses,
           stage, ease, review_due_date, last_review_date, card_created
    FROM cards
"#;

fn store_err(err: sqlx::Error) -> StudyError {
    StudyError::store(err)
}

/// A card insert that trips the deck foreign key means the deck is gone.
fn insert_card_err(err: sqlx::Error, deck_id: i64) -> StudyError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StudyError::deck_not_found(deck_id)
        }
        _ => store_err(err),
    }
}

fn to_cards(rows: Vec<DbCard>) -> Vec<Card> {
    rows.into_iter().map(DbCard::to_card).collect()
}

/// Card store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_cards(&self, sql: &str, deck_id: i64) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query_as::<_, DbCard>(sql)
            .bind(deck_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(to_cards(rows))
    }
}

#[async_trait]
impl DeckStore for PgStore {
    async fn create_deck(&self, name: &str) -> StoreResult<Deck> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            INSERT INTO decks (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(deck.to_deck())
    }

    async fn get_deck(&self, id: i64) -> StoreResult<Deck> {
        sqlx::query_as::<_, DbDeck>("SELECT id, name FROM decks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .map(DbDeck::to_deck)
            .ok_or_else(|| StudyError::deck_not_found(id))
    }

    async fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        let decks = sqlx::query_as::<_, DbDeck>("SELECT id, name FROM decks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(decks.into_iter().map(DbDeck::to_deck).collect())
    }

    async fn delete_deck(&self, id: i64) -> StoreResult<()> {
        // Cards go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(StudyError::deck_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl CardStore for PgStore {
    async fn create_card(&self, deck_id: i64, card: NewCard, now: DateTime<Utc>) -> StoreResult<Card> {
        let row = sqlx::query_as::<_, DbCard>(
            r#"
            INSERT INTO cards (deck_id, question, answer, extra, stage, ease,
                               review_due_date, card_created)
            VALUES ($1, $2, $3, $4, 'learning', 1, $5, $5)
            RETURNING id, deck_id, question, answer, extra, correct, incorrect, lapses,
                      stage, ease, review_due_date, last_review_date, card_created
            "#,
        )
        .bind(deck_id)
        .bind(&card.question)
        .bind(&card.answer)
        .bind(&card.extra)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_card_err(e, deck_id))?;

        Ok(row.to_card())
    }

    async fn get_card(&self, id: i64) -> StoreResult<Card> {
        sqlx::query_as::<_, DbCard>(&format!("{SELECT_CARDS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?
            .map(DbCard::to_card)
            .ok_or_else(|| StudyError::card_not_found(id))
    }

    async fn cards_in_deck(&self, deck_id: i64) -> StoreResult<Vec<Card>> {
        self.fetch_cards(&format!("{SELECT_CARDS} WHERE deck_id = $1 ORDER BY id"), deck_id)
            .await
    }

    async fn cards_by_deck_and_stage(&self, deck_id: i64, stage: Stage) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query_as::<_, DbCard>(&format!(
            "{SELECT_CARDS} WHERE deck_id = $1 AND stage = $2 ORDER BY id"
        ))
        .bind(deck_id)
        .bind(stage.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(to_cards(rows))
    }

    async fn due_review_cards(&self, deck_id: i64, now: DateTime<Utc>) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query_as::<_, DbCard>(&format!(
            "{SELECT_CARDS} WHERE deck_id = $1 AND stage = 'review' AND review_due_date <= $2 ORDER BY id"
        ))
        .bind(deck_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(to_cards(rows))
    }

    async fn count_cards_in_deck(&self, deck_id: i64) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE deck_id = $1")
            .bind(deck_id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(count as usize)
    }

    async fn sample_cards_excluding(
        &self,
        deck_id: i64,
        exclude_id: i64,
        limit: usize,
        seed: u64,
    ) -> StoreResult<Vec<Card>> {
        // Hashing the id with the seed gives a random order that repeats per seed
        let rows = sqlx::query_as::<_, DbCard>(&format!(
            "{SELECT_CARDS} WHERE deck_id = $1 AND id <> $2 ORDER BY md5(id::text || ':' || $4), id LIMIT $3"
        ))
        .bind(deck_id)
        .bind(exclude_id)
        .bind(limit as i64)
        .bind(seed.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(to_cards(rows))
    }

    async fn save_card(&self, card: &Card) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET question = $2,
                answer = $3,
                extra = $4,
                correct = $5,
                incorrect = $6,
                lapses = $7,
                stage = $8,
                ease = $9,
                review_due_date = $10,
                last_review_date = $11
            WHERE id = $1
            "#,
        )
        .bind(card.id)
        .bind(&card.question)
        .bind(&card.answer)
        .bind(&card.extra)
        .bind(i64::from(card.correct))
        .bind(i64::from(card.incorrect))
        .bind(i64::from(card.lapses))
        .bind(card.stage.as_str())
        .bind(i64::from(card.ease))
        .bind(card.review_due_date)
        .bind(card.last_review_date)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(StudyError::card_not_found(card.id));
        }
        Ok(())
    }

    async fn delete_card(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(StudyError::card_not_found(id));
        }
        Ok(())
    }
}

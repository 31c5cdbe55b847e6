//! PostgreSQL hand history store.

use async_trait::async_trait;
use log::info;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::history::{
    HandRepository, HistoryResult, NewHand, StoredHand, errors::HistoryError, settle_winnings,
};

const CREATE_HANDS_TABLE: &str = "CREATE TABLE IF NOT EXISTS hands (
    id VARCHAR(36) PRIMARY KEY,
    stacks BIGINT[] NOT NULL,
    dealer_index INTEGER NOT NULL,
    small_blind_index INTEGER NOT NULL,
    big_blind_index INTEGER NOT NULL,
    actions TEXT[] NOT NULL,
    hole_cards TEXT[] NOT NULL,
    board TEXT NOT NULL,
    winnings BIGINT[] NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const HAND_COLUMNS: &str = "id, stacks, dealer_index, small_blind_index, big_blind_index,
    actions, hole_cards, board, winnings, created_at";

/// PostgreSQL implementation of [`HandRepository`]
#[derive(Clone, Debug)]
pub struct PgHandRepository {
    pool: PgPool,
}

impl PgHandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `hands` table if it doesn't exist yet
    pub async fn init_schema(&self) -> HistoryResult<()> {
        sqlx::query(CREATE_HANDS_TABLE).execute(&self.pool).await?;
        info!("Hand history schema ready");
        Ok(())
    }
}

#[async_trait]
impl HandRepository for PgHandRepository {
    async fn create_hand(&self, hand: NewHand) -> HistoryResult<StoredHand> {
        hand.validate()?;
        let winnings = settle_winnings(&hand);
        let mut stored = StoredHand::from_new(hand, winnings);

        let row = sqlx::query(
            "INSERT INTO hands (id, stacks, dealer_index, small_blind_index, big_blind_index,
                                actions, hole_cards, board, winnings)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                stacks = EXCLUDED.stacks,
                dealer_index = EXCLUDED.dealer_index,
                small_blind_index = EXCLUDED.small_blind_index,
                big_blind_index = EXCLUDED.big_blind_index,
                actions = EXCLUDED.actions,
                hole_cards = EXCLUDED.hole_cards,
                board = EXCLUDED.board,
                winnings = EXCLUDED.winnings
             RETURNING created_at",
        )
        .bind(&stored.id)
        .bind(&stored.stacks)
        .bind(stored.dealer_index)
        .bind(stored.small_blind_index)
        .bind(stored.big_blind_index)
        .bind(&stored.actions)
        .bind(&stored.hole_cards)
        .bind(&stored.board)
        .bind(&stored.winnings)
        .fetch_one(&self.pool)
        .await?;

        stored.created_at = row.get::<chrono::NaiveDateTime, _>("created_at").and_utc();
        Ok(stored)
    }

    async fn list_hands(&self) -> HistoryResult<Vec<StoredHand>> {
        let rows = sqlx::query(&format!(
            "SELECT {HAND_COLUMNS} FROM hands ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(hand_from_row).collect()
    }

    async fn get_hand(&self, id: &str) -> HistoryResult<Option<StoredHand>> {
        let row = sqlx::query(&format!("SELECT {HAND_COLUMNS} FROM hands WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(hand_from_row).transpose()
    }
}

fn hand_from_row(r: &PgRow) -> HistoryResult<StoredHand> {
    Ok(StoredHand {
        id: r.try_get("id").map_err(corrupt)?,
        stacks: r.try_get("stacks").map_err(corrupt)?,
        dealer_index: r.try_get("dealer_index").map_err(corrupt)?,
        small_blind_index: r.try_get("small_blind_index").map_err(corrupt)?,
        big_blind_index: r.try_get("big_blind_index").map_err(corrupt)?,
        actions: r.try_get("actions").map_err(corrupt)?,
        hole_cards: r.try_get("hole_cards").map_err(corrupt)?,
        board: r.try_get("board").map_err(corrupt)?,
        winnings: r.try_get("winnings").map_err(corrupt)?,
        created_at: r
            .try_get::<chrono::NaiveDateTime, _>("created_at")
            .map_err(corrupt)?
            .and_utc(),
    })
}

fn corrupt(e: sqlx::Error) -> HistoryError {
    HistoryError::Corrupt(e.to_string())
}

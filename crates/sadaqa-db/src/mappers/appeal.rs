//! Appeal entity <-> model mapper

use uuid::Uuid;

use sadaqa_core::entities::Appeal;

use crate::models::AppealModel;

/// Convert AppealModel to Appeal entity
impl From<AppealModel> for Appeal {
    fn from(model: AppealModel) -> Self {
        Appeal {
            id: model.id,
            name: model.name,
            target_amount: model.target_amount,
            raised_amount: model.raised_amount,
            donor_count: model.donor_count,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert Appeal entity reference to values for database insertion
///
/// Campaign totals start at the schema defaults and only move through
/// `record_donation` or `recompute_totals`.
pub struct AppealInsert<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub target_amount: Option<i64>,
    pub active: bool,
}

impl<'a> AppealInsert<'a> {
    pub fn new(appeal: &'a Appeal) -> Self {
        Self {
            id: appeal.id,
            name: &appeal.name,
            target_amount: appeal.target_amount,
            active: appeal.active,
        }
    }
}

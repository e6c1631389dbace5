use super::case;
use super::error::Error;
use entity::actions::{ActiveModel, Column, Entity, Model};
use entity::{cases, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveValue::Set, ConnectionTrait, PaginatorTrait,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Number of cases whose actions are rewritten per transaction by
/// [`backfill_organization`].
pub const BATCH_SIZE: u64 = 1000;

/// Outcome of a completed [`backfill_organization`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Cases counted before the first batch started.
    pub total_cases: u64,
    /// Cases whose actions were rewritten and committed.
    pub processed_cases: u64,
    /// Number of committed batch transactions.
    pub batches: u64,
}

/// Records a new action against its case. The action always inherits the case's
/// organization, whatever the incoming model says.
pub async fn create(
    db: &impl ConnectionTrait,
    action_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!("New Action Model to be inserted: {action_model:?}");

    let case = case::find_by_id(db, action_model.case_id).await?;

    let action_active_model: ActiveModel = ActiveModel {
        case_id: Set(case.id),
        organization_id: Set(Some(case.organization_id)),
        action: Set(action_model.action),
        created_by_id: Set(user_id),
        created_on: Set(chrono::Utc::now().into()),
        assignee_id: Set(action_model.assignee_id),
        label_id: Set(action_model.label_id),
        note: Set(action_model.note),
        ..Default::default()
    };

    Ok(action_active_model.insert(db).await?)
}

/// Actions of `organization_id` in creation order, optionally only those created
/// strictly after `after`.
pub async fn find_by_organization(
    db: &impl ConnectionTrait,
    organization_id: Id,
    after: Option<DateTimeWithTimeZone>,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find().filter(Column::OrganizationId.eq(organization_id));

    if let Some(after) = after {
        query = query.filter(Column::CreatedOn.gt(after));
    }

    Ok(query
        .order_by_asc(Column::CreatedOn)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Copies each case's organization onto every action recorded against it.
///
/// Cases are walked in primary key order, `batch_size` at a time. Each batch is
/// written inside its own transaction and committed before the next one is read,
/// so a failure only rolls back the batch in flight. The error is returned as soon
/// as it happens; batches committed before it stay committed.
///
/// `on_progress` is called after every commit with the number of cases processed so
/// far and the total counted up front. Re-running the job rewrites the same values.
pub async fn backfill_organization<C, F>(
    db: &C,
    batch_size: u64,
    mut on_progress: F,
) -> Result<BackfillSummary, Error>
where
    C: ConnectionTrait + TransactionTrait,
    F: FnMut(u64, u64),
{
    let batch_size = batch_size.max(1);
    let total_cases = cases::Entity::find().count(db).await?;
    info!("Found {total_cases} cases to update actions for...");

    let mut summary = BackfillSummary {
        total_cases,
        ..Default::default()
    };
    let mut last_id: Option<Id> = None;

    loop {
        let mut query = cases::Entity::find()
            .order_by_asc(cases::Column::Id)
            .limit(batch_size);
        if let Some(last_id) = last_id {
            query = query.filter(cases::Column::Id.gt(last_id));
        }

        let batch = query.all(db).await?;
        let Some(last_case) = batch.last() else {
            break;
        };
        last_id = Some(last_case.id);

        let txn = db.begin().await?;
        for case in &batch {
            Entity::update_many()
                .col_expr(Column::OrganizationId, Expr::value(case.organization_id))
                .filter(Column::CaseId.eq(case.id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        summary.processed_cases += batch.len() as u64;
        summary.batches += 1;
        on_progress(summary.processed_cases, total_cases);

        if (batch.len() as u64) < batch_size {
            break;
        }
    }

    Ok(summary)
}

use super::error::Error;
use chrono::Utc;
use entity::cases::{ActiveModel, Column, Entity, Model};
use entity::{cases_labels, Id};
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// A case together with the ids of the labels attached to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CaseWithLabels {
    #[serde(flatten)]
    pub case: Model,
    pub label_ids: Vec<Id>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    case_model: Model,
    label_ids: Vec<Id>,
) -> Result<CaseWithLabels, Error> {
    debug!("New Case Model to be inserted: {case_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        organization_id: Set(case_model.organization_id),
        assignee_id: Set(case_model.assignee_id),
        summary: Set(case_model.summary),
        opened_on: Set(case_model.opened_on),
        closed_on: Set(case_model.closed_on),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let case = active_model.insert(db).await?;

    for label_id in &label_ids {
        cases_labels::ActiveModel {
            case_id: Set(case.id),
            label_id: Set(*label_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(CaseWithLabels { case, label_ids })
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_organization(
    db: &impl ConnectionTrait,
    organization_id: Id,
) -> Result<Vec<CaseWithLabels>, Error> {
    let cases = Entity::find()
        .filter(Column::OrganizationId.eq(organization_id))
        .order_by_desc(Column::OpenedOn)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;

    with_labels(db, cases).await
}

/// Cases of another organization are reported as missing.
pub async fn find_by_id_in_organization(
    db: &impl ConnectionTrait,
    id: Id,
    organization_id: Id,
) -> Result<CaseWithLabels, Error> {
    let case = Entity::find_by_id(id)
        .filter(Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(Error::not_found)?;

    with_labels(db, vec![case])
        .await?
        .pop()
        .ok_or_else(Error::not_found)
}

async fn with_labels(
    db: &impl ConnectionTrait,
    cases: Vec<Model>,
) -> Result<Vec<CaseWithLabels>, Error> {
    if cases.is_empty() {
        return Ok(Vec::new());
    }

    let case_ids: Vec<Id> = cases.iter().map(|case| case.id).collect();
    let mut labels_by_case: HashMap<Id, Vec<Id>> = HashMap::new();
    for link in cases_labels::Entity::find()
        .filter(cases_labels::Column::CaseId.is_in(case_ids))
        .order_by_asc(cases_labels::Column::LabelId)
        .all(db)
        .await?
    {
        labels_by_case
            .entry(link.case_id)
            .or_default()
            .push(link.label_id);
    }

    Ok(cases
        .into_iter()
        .map(|case| CaseWithLabels {
            label_ids: labels_by_case.remove(&case.id).unwrap_or_default(),
            case,
        })
        .collect())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn case_model(id: Id, organization_id: Id) -> Model {
        let now = Utc::now();
        Model {
            id,
            organization_id,
            assignee_id: None,
            summary: format!("Case {id}"),
            opened_on: now.into(),
            closed_on: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn link(id: Id, case_id: Id, label_id: Id) -> cases_labels::Model {
        cases_labels::Model {
            id,
            case_id,
            label_id,
        }
    }

    #[tokio::test]
    async fn find_by_organization_attaches_label_ids_per_case() -> Result<(), Error> {
        let first = case_model(1, 3);
        let second = case_model(2, 3);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[first.clone(), second.clone()]])
            .append_query_results([[link(1, 1, 10), link(2, 1, 11)]])
            .into_connection();

        let cases = find_by_organization(&db, 3).await?;

        assert_eq!(
            cases,
            vec![
                CaseWithLabels {
                    case: first,
                    label_ids: vec![10, 11],
                },
                CaseWithLabels {
                    case: second,
                    label_ids: vec![],
                },
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_by_organization_skips_label_query_without_cases() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let cases = find_by_organization(&db, 3).await?;

        assert!(cases.is_empty());
        assert_eq!(db.into_transaction_log().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_in_organization_hides_other_organizations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id_in_organization(&db, 1, 42).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn serializes_case_fields_flat_next_to_label_ids() {
        let case = CaseWithLabels {
            case: case_model(4, 3),
            label_ids: vec![7],
        };

        let json = serde_json_value(&case);

        assert_eq!(json["id"], 4);
        assert_eq!(json["organization_id"], 3);
        assert_eq!(json["label_ids"][0], 7);
    }

    fn serde_json_value(case: &CaseWithLabels) -> serde_json::Value {
        serde_json::to_value(case).expect("case serializes")
    }
}

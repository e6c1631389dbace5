use chrono::{Duration, Utc};
use log::*;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Value};
use std::collections::HashMap;

pub use entity::{
    action_type, actions, cases, cases_labels, labels, organizations, partners, profiles, roles,
    user_roles, users, Id, RESERVED_USER_ID,
};

pub mod action;
pub mod case;
pub mod error;
pub mod label;
pub mod organization;
pub mod partner;
pub mod profile;
pub mod query;
pub mod user;
pub mod user_role;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// This structure is particularly useful in scenarios where you need to pass filter parameters
/// from a web request down to the database query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("organization_id".to_string(), Some(Value::Int(Some(1))));
/// let filter_value = query_filter_map.get("organization_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
///
/// Implementing this trait for a struct allows you to define how the fields of the struct should be
/// mapped to the keys and values of the `QueryFilterMap`. This ensures that the data is passed
/// in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use entity_api::QueryFilterMap;
/// use entity_api::IntoQueryFilterMap;
///
/// #[derive(Debug)]
/// struct MyParams {
///     organization_id: i32,
/// }
///
/// impl IntoQueryFilterMap for MyParams {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "organization_id".to_string(),
///             Some(sea_orm::Value::Int(Some(self.organization_id))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Populates an empty database with one organization, a user per role, labels,
/// partners, cases and a handful of actions.
///
/// The actions are inserted without an organization so that the backfill job has
/// rows to correct.
pub async fn seed_database(db: &impl ConnectionTrait) -> Result<(), error::Error> {
    let now = Utc::now();

    let acme_support = organization::create(
        db,
        organizations::Model {
            id: 0,
            name: "Acme Support".to_owned(),
            slug: String::new(),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    let mut members = Vec::new();
    for (email, full_name, role) in [
        ("admin@acme.example", "Ada Admin", roles::Role::Admin),
        ("editor@acme.example", "Eddie Editor", roles::Role::Editor),
        ("viewer@acme.example", "Vera Viewer", roles::Role::Viewer),
    ] {
        let user = users::ActiveModel {
            email: Set(email.to_owned()),
            password: Set(generate_hash("password")),
            is_active: Set(true),
            is_superuser: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        profiles::ActiveModel {
            user_id: Set(user.id),
            full_name: Set(full_name.to_owned()),
            change_password: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        user_roles::ActiveModel {
            role: Set(role),
            organization_id: Set(acme_support.id),
            user_id: Set(user.id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        members.push(user);
    }

    let mut label_ids = Vec::new();
    for name in ["billing", "outage", "feature-request"] {
        let label = label::create(
            db,
            labels::Model {
                id: 0,
                organization_id: acme_support.id,
                name: name.to_owned(),
                description: None,
                is_active: true,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?;
        label_ids.push(label.id);
    }

    let partner = partner::create(
        db,
        partners::Model {
            id: 0,
            organization_id: acme_support.id,
            name: "Northwind Field Services".to_owned(),
            description: Some("On-site hardware repairs".to_owned()),
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    let created_by = members
        .first()
        .map(|user| user.id)
        .unwrap_or(RESERVED_USER_ID);

    for (days_ago, summary) in [
        (7, "Invoice shows a duplicate charge"),
        (3, "Dashboard unreachable from EU region"),
        (1, "Request: export cases as CSV"),
    ] {
        let opened_on = now - Duration::days(days_ago);
        let case = cases::ActiveModel {
            organization_id: Set(acme_support.id),
            assignee_id: Set(Some(partner.id)),
            summary: Set(summary.to_owned()),
            opened_on: Set(opened_on.into()),
            closed_on: Set(None),
            created_at: Set(opened_on.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let label_id = label_ids[(days_ago as usize) % label_ids.len()];
        cases_labels::ActiveModel {
            case_id: Set(case.id),
            label_id: Set(label_id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for (offset, action, note) in [
            (0, action_type::ActionType::Open, None),
            (1, action_type::ActionType::Reassign, None),
            (2, action_type::ActionType::AddNote, Some("Customer contacted")),
        ] {
            actions::ActiveModel {
                case_id: Set(case.id),
                organization_id: Set(None),
                action: Set(action),
                created_by_id: Set(created_by),
                created_on: Set((opened_on + Duration::hours(offset)).into()),
                assignee_id: Set(Some(partner.id)),
                label_id: Set(None),
                note: Set(note.map(str::to_owned)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    info!(
        "Seeded organization {} with {} users",
        acme_support.slug,
        members.len()
    );
    Ok(())
}

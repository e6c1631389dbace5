use crate::{
    controller::health_check_controller, middleware::auth::require_auth, protect, AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};

use crate::controller::{
    action_controller, api_controller, case_controller, label_controller, organization,
    organization_controller, partner_controller, profile_controller, user_controller,
    user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Casework Platform API"
        ),
        paths(
            api_controller::root,
            action_controller::index,
            case_controller::index,
            case_controller::read,
            label_controller::index,
            label_controller::read,
            partner_controller::index,
            partner_controller::read,
            health_check_controller::health_check,
            organization_controller::index,
            organization::user_controller::index,
            organization::user_controller::create,
            organization::user_controller::read,
            organization::user_controller::update,
            profile_controller::read,
            profile_controller::update,
            user_controller::index,
            user_controller::create,
            user_controller::read,
            user_controller::update,
            user_session_controller::login,
            user_session_controller::delete,
        ),
        components(
            schemas(
                domain::actions::Model,
                domain::case::CaseWithLabels,
                domain::labels::Model,
                domain::organizations::Model,
                domain::partners::Model,
                domain::user::Credentials,
                domain::user::SelfForm,
                domain::user::UserForm,
                domain::user::UserSummary,
                crate::response::user::UserDetailResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "casework_platform", description = "Casework Platform API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(organization_routes(app_state.clone()))
        .merge(organization_api_routes(app_state.clone()))
        .merge(organization_user_routes(app_state.clone()))
        .merge(profile_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        // **** FIXME: protect the OpenAPI web UI
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn organization_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/organizations", get(organization_controller::index))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

/// Read-only browsing of an organization's casework resources, open to any of
/// its members.
fn organization_api_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/organizations/:organization_id/api",
            get(api_controller::root),
        )
        .route(
            "/organizations/:organization_id/api/actions",
            get(action_controller::index),
        )
        .route(
            "/organizations/:organization_id/api/cases",
            get(case_controller::index),
        )
        .route(
            "/organizations/:organization_id/api/cases/:id",
            get(case_controller::read),
        )
        .route(
            "/organizations/:organization_id/api/labels",
            get(label_controller::index),
        )
        .route(
            "/organizations/:organization_id/api/labels/:id",
            get(label_controller::read),
        )
        .route(
            "/organizations/:organization_id/api/partners",
            get(partner_controller::index),
        )
        .route(
            "/organizations/:organization_id/api/partners/:id",
            get(partner_controller::read),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            protect::organizations::api::member,
        ))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn organization_user_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // GET|POST /organizations/:organization_id/users
            Router::new()
                .route(
                    "/organizations/:organization_id/users",
                    get(organization::user_controller::index)
                        .post(organization::user_controller::create),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::organizations::users::collection,
                )),
        )
        .merge(
            // GET|PUT /organizations/:organization_id/users/:user_id
            Router::new()
                .route(
                    "/organizations/:organization_id/users/:user_id",
                    get(organization::user_controller::read)
                        .put(organization::user_controller::update),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::organizations::users::member,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn profile_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/profile/self",
            get(profile_controller::read).put(profile_controller::update),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            get(user_controller::index).post(user_controller::create),
        )
        .route(
            "/users/:user_id",
            get(user_controller::read).put(user_controller::update),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            protect::users::superuser,
        ))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/delete", delete(user_session_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

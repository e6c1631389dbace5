use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_login::AuthSession;

/// Rejects requests without a logged in user with 401 instead of redirecting
/// to a login page.
pub async fn require_auth(
    auth_session: AuthSession<domain::user::Backend>,
    request: Request,
    next: Next,
) -> Response {
    match auth_session.user {
        Some(_user) => next.run(request).await,
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn,
        routing::{get, post},
        Router,
    };
    use axum_login::{
        tower_sessions::{Expiry, MemoryStore, SessionManagerLayer},
        AuthManagerLayerBuilder,
    };
    use chrono::Utc;
    use domain::{user::Backend, user_roles, users};
    use password_auth::generate_hash;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;

    fn app(db: DatabaseConnection) -> Router {
        let db = Arc::new(db);
        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_secure(false)
            .with_expiry(Expiry::OnInactivity(Duration::days(1)))
            .with_always_save(true);
        let auth_layer = AuthManagerLayerBuilder::new(Backend::new(&db), session_layer).build();

        Router::new()
            .route(
                "/login",
                post(crate::controller::user_session_controller::login),
            )
            .merge(
                Router::new()
                    .route("/cases", get(|| async { "cases" }))
                    .route_layer(from_fn(require_auth)),
            )
            .layer(auth_layer)
            .with_state(crate::AppState::new(Config::default(), &db))
    }

    fn get_cases(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/cases");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn rejects_requests_without_a_session() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let response = app.oneshot(get_cases(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_requests_with_an_unknown_session_cookie() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let response = app
            .oneshot(get_cases(Some("id=not-a-known-session")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn lets_a_logged_in_user_through() {
        let caseworker = users::Model {
            id: 2,
            email: "caseworker@casework.example".to_string(),
            password: generate_hash("hunter22"),
            is_active: true,
            is_superuser: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            roles: vec![],
        };
        let row = (caseworker, None::<user_roles::Model>);
        // login by email, then one session lookup per request
        let app = app(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row.clone()]])
            .append_query_results([[row.clone()]])
            .append_query_results([[row]])
            .into_connection());

        let login = Request::builder()
            .uri("/login")
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(
                "email=caseworker@casework.example&password=hunter22",
            ))
            .unwrap();
        let login_response = app.clone().oneshot(login).await.unwrap();
        let cookie = login_response
            .headers()
            .get("set-cookie")
            .and_then(|c| c.to_str().ok())
            .expect("login sets a session cookie")
            .to_string();

        let response = app.oneshot(get_cases(Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

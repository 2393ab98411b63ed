//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::HeaderValue,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{LoginRequest, NewConversion, NewFavorite, NewUser, UpdateUser},
    state::AppState,
    validation::{validate_base_code, validate_email, validate_unit, validate_value},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/conversions",
            get(get_conversions)
                .post(create_conversion)
                .delete(clear_conversions),
        )
        .route("/api/conversions/count", get(get_conversion_count))
        .route("/api/favorites", get(get_favorites).post(create_favorite))
        .route("/api/favorites/:id", delete(delete_favorite))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/exchange-rates/:base", get(get_exchange_rates))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "converter-api"
    }))
}

/// Upsert a user from an external-identity sign-in
///
/// Creates the user on first sign-in and refreshes email/name when they
/// changed upstream.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = payload.uid.as_deref().map(str::trim).unwrap_or("");
    let email = payload.email.as_deref().map(str::trim).unwrap_or("");

    if uid.is_empty() || email.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }
    validate_email(email).map_err(ApiError::BadRequest)?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(email)
        .to_string();

    let user = match state.store.user_by_external_id(uid).await? {
        Some(existing) => {
            if existing.email != email || existing.name != name {
                state
                    .store
                    .update_user(
                        existing.id,
                        &UpdateUser {
                            email: Some(email.to_string()),
                            name: Some(name),
                        },
                    )
                    .await?
                    .ok_or(ApiError::InternalServerError)?
            } else {
                existing
            }
        }
        None => {
            state
                .store
                .create_user(&NewUser {
                    email: email.to_string(),
                    name,
                    external_auth_id: uid.to_string(),
                })
                .await?
        }
    };

    Ok(Json(user))
}

/// Fetch exchange rates for a base currency
///
/// The mapping is never empty; the `x-rate-source` response header tells
/// the caller which stage of the provider fallback chain answered.
pub async fn get_exchange_rates(
    State(state): State<AppState>,
    Path(base): Path<String>,
) -> Result<Response, ApiError> {
    let base = base.trim().to_uppercase();
    validate_base_code(&base).map_err(ApiError::BadRequest)?;

    let (rates, source) = state.rate_gateway.fetch_rates(&base).await;

    let mut response = Json(rates).into_response();
    response
        .headers_mut()
        .insert("x-rate-source", HeaderValue::from_static(source.as_str()));
    Ok(response)
}

/// Get the authenticated user's conversion history, newest first
pub async fn get_conversions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let conversions = state.store.conversions(user.id).await?;
    Ok(Json(conversions))
}

/// Count the authenticated user's conversion history entries
pub async fn get_conversion_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.store.conversion_count(user.id).await?;
    Ok(Json(count))
}

/// Append a conversion to the authenticated user's history
pub async fn create_conversion(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewConversion>,
) -> Result<impl IntoResponse, ApiError> {
    validate_unit("fromUnit", &payload.from_unit).map_err(ApiError::BadRequest)?;
    validate_unit("toUnit", &payload.to_unit).map_err(ApiError::BadRequest)?;
    validate_value("fromValue", payload.from_value).map_err(ApiError::BadRequest)?;
    validate_value("toValue", payload.to_value).map_err(ApiError::BadRequest)?;
    if let Some(rate) = payload.exchange_rate {
        validate_value("exchangeRate", rate).map_err(ApiError::BadRequest)?;
    }

    let conversion = state.store.create_conversion(user.id, &payload).await?;
    Ok(Json(conversion))
}

/// Clear the authenticated user's conversion history
pub async fn clear_conversions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.clear_conversions(user.id).await?;
    Ok(Json(json!({"message": "Conversion history cleared"})))
}

/// Get the authenticated user's favorites, newest first
pub async fn get_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let favorites = state.store.favorites(user.id).await?;
    Ok(Json(favorites))
}

/// Save a favorite conversion pair for the authenticated user
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewFavorite>,
) -> Result<impl IntoResponse, ApiError> {
    validate_unit("fromUnit", &payload.from_unit).map_err(ApiError::BadRequest)?;
    validate_unit("toUnit", &payload.to_unit).map_err(ApiError::BadRequest)?;

    let existing = state
        .store
        .find_favorite(user.id, payload.kind, &payload.from_unit, &payload.to_unit)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Favorite already exists".to_string()));
    }

    let favorite = state.store.create_favorite(user.id, &payload).await?;
    Ok(Json(favorite))
}

/// Remove one of the authenticated user's favorites
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.store.delete_favorite(user.id, id).await?;

    if deleted {
        Ok(Json(json!({"message": "Favorite removed"})))
    } else {
        Err(ApiError::NotFound("Favorite not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::USER_ID_HEADER;
    use crate::rates::{RateGateway, RateGatewayConfig};
    use crate::storage::MemStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    /// Router backed by the in-memory store and unreachable rate providers
    fn test_router() -> Router {
        let gateway = RateGateway::new(RateGatewayConfig {
            primary_url: "http://127.0.0.1:9/latest".to_string(),
            backup_url: "http://127.0.0.1:9/currencies".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        create_router(AppState {
            store: Arc::new(MemStore::new()),
            rate_gateway: gateway,
        })
    }

    fn json_request(method: &str, uri: &str, user_id: Option<i64>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(id) = user_id {
            builder = builder.header(USER_ID_HEADER, id.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn bare_request(method: &str, uri: &str, user_id: Option<i64>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user_id {
            builder = builder.header(USER_ID_HEADER, id.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Sign a user in and return their id
    async fn sign_in(router: &Router, uid: &str, email: &str, name: &str) -> i64 {
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"uid": uid, "email": email, "name": name}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let router = test_router();
        let response = router
            .oneshot(bare_request("GET", "/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn login_requires_uid_and_email() {
        let router = test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"email": "ada@example.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn login_upserts_by_external_id() {
        let router = test_router();
        let first = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;

        // Same identity with a changed name updates the row in place
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"uid": "ext-1", "email": "ada@example.com", "name": "Ada Lovelace"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"].as_i64().unwrap(), first);
        assert_eq!(body["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn login_falls_back_to_email_as_name() {
        let router = test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"uid": "ext-2", "email": "grace@example.com"}),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["name"], "grace@example.com");
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_header() {
        let router = test_router();
        for uri in [
            "/api/conversions",
            "/api/conversions/count",
            "/api/favorites",
        ] {
            let response = router
                .clone()
                .oneshot(bare_request("GET", uri, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn unknown_user_ids_are_rejected() {
        let router = test_router();
        let response = router
            .oneshot(bare_request("GET", "/api/conversions", Some(42)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn conversion_history_round_trip() {
        let router = test_router();
        let user_id = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/conversions",
                Some(user_id),
                json!({
                    "type": "length",
                    "fromUnit": "cm",
                    "toUnit": "m",
                    "fromValue": 100.0,
                    "toValue": 1.0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["userId"].as_i64().unwrap(), user_id);
        assert_eq!(created["type"], "length");

        let response = router
            .clone()
            .oneshot(bare_request("GET", "/api/conversions", Some(user_id)))
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let response = router
            .clone()
            .oneshot(bare_request("GET", "/api/conversions/count", Some(user_id)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_i64().unwrap(), 1);
    }

    #[tokio::test]
    async fn clearing_history_only_touches_the_caller() {
        let router = test_router();
        let ada = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;
        let grace = sign_in(&router, "ext-2", "grace@example.com", "Grace").await;

        for user_id in [ada, grace] {
            router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/conversions",
                    Some(user_id),
                    json!({
                        "type": "weight",
                        "fromUnit": "kg",
                        "toUnit": "lb",
                        "fromValue": 70.0,
                        "toValue": 154.32
                    }),
                ))
                .await
                .unwrap();
        }

        let response = router
            .clone()
            .oneshot(bare_request("DELETE", "/api/conversions", Some(ada)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(bare_request("GET", "/api/conversions/count", Some(ada)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_i64().unwrap(), 0);

        let response = router
            .clone()
            .oneshot(bare_request("GET", "/api/conversions/count", Some(grace)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_i64().unwrap(), 1);
    }

    #[tokio::test]
    async fn conversion_payloads_are_validated() {
        let router = test_router();
        let user_id = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/conversions",
                Some(user_id),
                json!({
                    "type": "length",
                    "fromUnit": "",
                    "toUnit": "m",
                    "fromValue": 1.0,
                    "toValue": 0.01
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_favorite_returns_conflict() {
        let router = test_router();
        let user_id = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;
        let favorite = json!({"type": "length", "fromUnit": "cm", "toUnit": "all"});

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/favorites",
                Some(user_id),
                favorite.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/favorites",
                Some(user_id),
                favorite,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = router
            .clone()
            .oneshot(bare_request("GET", "/api/favorites", Some(user_id)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn favorite_deletion_is_scoped_to_the_owner() {
        let router = test_router();
        let ada = sign_in(&router, "ext-1", "ada@example.com", "Ada").await;
        let grace = sign_in(&router, "ext-2", "grace@example.com", "Grace").await;

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/favorites",
                Some(ada),
                json!({"type": "currency", "fromUnit": "USD", "toUnit": "EUR"}),
            ))
            .await
            .unwrap();
        let favorite_id = body_json(response).await["id"].as_i64().unwrap();

        let response = router
            .clone()
            .oneshot(bare_request(
                "DELETE",
                &format!("/api/favorites/{}", favorite_id),
                Some(grace),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router
            .clone()
            .oneshot(bare_request(
                "DELETE",
                &format!("/api/favorites/{}", favorite_id),
                Some(ada),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn exchange_rates_always_return_a_mapping() {
        // Both providers are unreachable, so the static table answers
        let router = test_router();
        let response = router
            .oneshot(bare_request("GET", "/api/exchange-rates/USD", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-rate-source").unwrap(),
            "static"
        );
        let body = body_json(response).await;
        assert!(!body.as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_base_codes_are_rejected() {
        let router = test_router();
        let response = router
            .oneshot(bare_request("GET", "/api/exchange-rates/US1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

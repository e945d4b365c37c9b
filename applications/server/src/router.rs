/// HTTP routing
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application: JSON API under `/api` plus the pages
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/login", post(api::auth::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/logout", post(api::auth::logout))
        // Contacts
        .route(
            "/contacts",
            get(api::contacts::list_contacts).post(api::contacts::create_contact),
        )
        .route("/contacts/:id", get(api::contacts::get_contact))
        .route("/contacts/:id/assign", post(api::contacts::assign_contact))
        .route("/contacts/:id/toggle-type", post(api::contacts::toggle_type))
        // Notes
        .route(
            "/contacts/:id/notes",
            get(api::notes::list_notes).post(api::notes::add_note),
        )
        // Users (administrators)
        .route(
            "/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    let public_pages = Router::new()
        .route("/", get(api::pages::index))
        .route(
            "/login",
            get(api::pages::login_form).post(api::pages::login_submit),
        )
        .route("/logout", get(api::pages::logout));

    let protected_pages = Router::new()
        .route("/dashboard", get(api::pages::dashboard))
        .route("/contacts/:id", get(api::pages::contact_page))
        .route("/users", get(api::pages::users_page))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::page_auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(public_pages)
        .merge(protected_pages)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

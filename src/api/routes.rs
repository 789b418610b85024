use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{bill_handlers, handlers, result_handlers, user_handlers};
use crate::app::AppState;
use crate::model::{Algorithm, Dataset};

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Algorithms
        .route(
            "/algorithms/",
            get(handlers::search_resources::<Algorithm>)
                .post(handlers::upsert_resource::<Algorithm>),
        )
        .route(
            "/algorithms/:algorithm_id",
            get(handlers::get_resource::<Algorithm>)
                .delete(handlers::delete_resource::<Algorithm>),
        )
        // Datasets
        .route(
            "/datasets/",
            get(handlers::search_resources::<Dataset>).post(handlers::upsert_resource::<Dataset>),
        )
        .route(
            "/datasets/:dataset_id",
            get(handlers::get_resource::<Dataset>).delete(handlers::delete_resource::<Dataset>),
        )
        // The caller's own user record
        .route(
            "/user/",
            get(user_handlers::get_user)
                .post(user_handlers::upsert_user)
                .delete(user_handlers::delete_user),
        )
        // Execution and result sets
        .route(
            "/results/:algorithm_id/:dataset_id",
            post(result_handlers::execute).get(result_handlers::get_result_for_pair),
        )
        .route("/results/:result_set_id", get(result_handlers::get_result))
        // Billing
        .route("/bill/", get(bill_handlers::get_bill))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

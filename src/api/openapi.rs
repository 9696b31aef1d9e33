//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, books, health, lendings, members};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfmark API",
        version = "0.1.0",
        description = "Library lending and catalog search REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Admin
        admin::initialize,
        // Members
        members::register_member,
        members::list_members,
        members::get_member,
        members::update_member,
        members::ban_member,
        members::member_lendings,
        // Books
        books::register_books,
        books::search_books,
        books::get_book,
        // Lendings
        lendings::lend_books,
        lendings::list_lendings,
        lendings::return_books,
    ),
    components(
        schemas(
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            crate::models::member::MemberPage,
            // Books
            crate::models::book::Book,
            crate::models::book::BookWithLending,
            crate::models::book::CreateBook,
            crate::models::book::BookPage,
            // Lendings
            crate::models::lending::Lending,
            crate::models::lending::LendingDetails,
            crate::models::lending::LendingBatch,
            // Admin
            admin::InitializeResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "admin", description = "Maintenance"),
        (name = "members", description = "Member registry"),
        (name = "books", description = "Catalog registration and search"),
        (name = "lendings", description = "Lending and return")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

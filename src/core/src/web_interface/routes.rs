use serde::Serialize;
use serde_json::{Map, Value};
use warp::filters::BoxedFilter;
use warp::{http::StatusCode, reply, reply::Response, Filter, Rejection, Reply};

use super::types::*;
use crate::catalog::{server_time, Catalog};
use crate::error_handling::types::CatalogError;

type Body = Map<String, Value>;

fn with_catalog(catalog: Catalog) -> impl Filter<Extract = (Catalog,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || catalog.clone())
}

fn json_body() -> impl Filter<Extract = (Body,), Error = Rejection> + Clone {
    warp::body::json::<Body>()
}

/// HTTP status for a catalog failure.
pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Conflict(_) => StatusCode::BAD_REQUEST,
        CatalogError::InvalidRecord(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogError::Storage(_) | CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_reply(status: StatusCode, detail: impl Into<String>) -> Response {
    reply::with_status(
        reply::json(&ApiError {
            detail: detail.into(),
        }),
        status,
    )
    .into_response()
}

fn respond<T: Serialize>(result: Result<T, CatalogError>) -> Result<Response, Rejection> {
    let response = match result {
        Ok(body) => reply::json(&body).into_response(),
        Err(err) => error_reply(status_for(&err), err.to_string()),
    };
    Ok::<_, Rejection>(response)
}

/// Every API route.
pub fn api(catalog: Catalog) -> BoxedFilter<(Response,)> {
    product_routes(catalog.clone())
        .or(release_routes(catalog.clone()))
        .unify()
        .or(client_routes(catalog.clone()))
        .unify()
        .or(license_routes(catalog.clone()))
        .unify()
        .or(settings_routes(catalog.clone()))
        .unify()
        .or(assignment_routes(catalog.clone()))
        .unify()
        .or(feed_routes(catalog))
        .unify()
        .boxed()
}

// Products

/// GET/POST /api/products, PUT/DELETE /api/products/:id
pub fn product_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let list = warp::path!("api" / "products")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.products.list()) });

    let create = warp::path!("api" / "products")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|body: Body, catalog: Catalog| async move { respond(catalog.products.create(body)) });

    let update = warp::path!("api" / "products" / i64)
        .and(warp::put())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.products.update(id, body))
        });

    let delete = warp::path!("api" / "products" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .products
                    .delete(id)
                    .map(|_| MessageResponse::new("Product deleted")),
            )
        });

    list.or(create)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

// Releases and their sub-resources

/// GET/POST /api/releases, DELETE /api/releases/:id and the
/// artifacts, update-logs and dependencies sub-resources.
pub fn release_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let list = warp::path!("api" / "releases")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.releases.list()) });

    let upsert = warp::path!("api" / "releases")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|body: Body, catalog: Catalog| async move { respond(catalog.releases.upsert(body)) });

    let delete = warp::path!("api" / "releases" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .releases
                    .delete(id)
                    .map(|_| MessageResponse::new("deleted")),
            )
        });

    let add_artifact = warp::path!("api" / "releases" / i64 / "artifacts")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.releases.add_artifact(id, body))
        });

    let delete_artifact = warp::path!("api" / "releases" / i64 / "artifacts" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, artifact_id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .releases
                    .delete_artifact(id, artifact_id)
                    .map(|_| DeletedResponse { deleted: artifact_id }),
            )
        });

    let add_log = warp::path!("api" / "releases" / i64 / "update-logs")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.releases.add_update_log(id, body))
        });

    let delete_log = warp::path!("api" / "releases" / i64 / "update-logs" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, log_id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .releases
                    .delete_update_log(id, log_id)
                    .map(|_| DeletedResponse { deleted: log_id }),
            )
        });

    let add_dependency = warp::path!("api" / "releases" / i64 / "dependencies")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.releases.add_dependency(id, body))
        });

    let delete_dependency = warp::path!("api" / "releases" / i64 / "dependencies" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, dependency_id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .releases
                    .delete_dependency(id, dependency_id)
                    .map(|_| DeletedResponse { deleted: dependency_id }),
            )
        });

    list.or(upsert)
        .unify()
        .or(delete)
        .unify()
        .or(add_artifact)
        .unify()
        .or(delete_artifact)
        .unify()
        .or(add_log)
        .unify()
        .or(delete_log)
        .unify()
        .or(add_dependency)
        .unify()
        .or(delete_dependency)
        .unify()
        .boxed()
}

// Clients

pub fn client_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let list = warp::path!("api" / "clients")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.clients.list()) });

    let get = warp::path!("api" / "clients" / i64)
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, catalog: Catalog| async move { respond(catalog.clients.get(id)) });

    let create = warp::path!("api" / "clients")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|body: Body, catalog: Catalog| async move { respond(catalog.clients.create(body)) });

    let update = warp::path!("api" / "clients" / i64)
        .and(warp::put())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.clients.update(id, body))
        });

    let delete = warp::path!("api" / "clients" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .clients
                    .delete(id)
                    .map(|_| MessageResponse::new("Client deleted")),
            )
        });

    list.or(get)
        .unify()
        .or(create)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

// Licenses

pub fn license_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let list = warp::path!("api" / "licenses")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.licenses.list()) });

    let get = warp::path!("api" / "licenses" / i64)
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, catalog: Catalog| async move { respond(catalog.licenses.get(id)) });

    let create = warp::path!("api" / "licenses")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|body: Body, catalog: Catalog| async move { respond(catalog.licenses.create(body)) });

    let update = warp::path!("api" / "licenses" / i64)
        .and(warp::put())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|id: i64, body: Body, catalog: Catalog| async move {
            respond(catalog.licenses.update(id, body))
        });

    let delete = warp::path!("api" / "licenses" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .licenses
                    .delete(id)
                    .map(|_| MessageResponse::new(format!("License {} deleted successfully", id))),
            )
        });

    list.or(get)
        .unify()
        .or(create)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

// Settings

/// GET /api/settings, POST /api/settings/user,
/// POST /api/settings/notifications, DELETE /api/settings/notifications/:id
pub fn settings_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let get = warp::path!("api" / "settings")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.settings.get()) });

    let update_user = warp::path!("api" / "settings" / "user")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|user: Body, catalog: Catalog| async move {
            respond(
                catalog
                    .settings
                    .update_user(user)
                    .map(|user| UserUpdatedResponse {
                        message: "User updated successfully".into(),
                        user,
                    }),
            )
        });

    let add_notification = warp::path!("api" / "settings" / "notifications")
        .and(warp::post())
        .and(json_body())
        .and(with_catalog(catalog.clone()))
        .and_then(|body: Body, catalog: Catalog| async move {
            respond(
                catalog
                    .settings
                    .add_notification(body)
                    .map(|notification| NotificationAddedResponse {
                        message: "Notification added successfully".into(),
                        notification,
                    }),
            )
        });

    let delete_notification = warp::path!("api" / "settings" / "notifications" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(catalog.settings.delete_notification(id).map(|_| {
                MessageResponse::new(format!("Notification {} deleted successfully", id))
            }))
        });

    get.or(update_user)
        .unify()
        .or(add_notification)
        .unify()
        .or(delete_notification)
        .unify()
        .boxed()
}

// Client-product assignments

/// GET /client-products, POST /clients/:clientId/assign/:productId,
/// DELETE /client-products/:id
pub fn assignment_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let list = warp::path!("client-products")
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(|catalog: Catalog| async move { respond(catalog.assignments.list()) });

    let assign = warp::path!("clients" / i64 / "assign" / i64)
        .and(warp::post())
        .and(with_catalog(catalog.clone()))
        .and_then(|client_id: i64, product_id: i64, catalog: Catalog| async move {
            respond(catalog.assignments.assign(client_id, product_id))
        });

    let delete = warp::path!("client-products" / i64)
        .and(warp::delete())
        .and(with_catalog(catalog))
        .and_then(|id: i64, catalog: Catalog| async move {
            respond(
                catalog
                    .assignments
                    .delete(id)
                    .map(|_| SuccessResponse { success: true }),
            )
        });

    list.or(assign).unify().or(delete).unify().boxed()
}

// Read-only views

/// GET /api/updates, GET /api/time
pub fn feed_routes(catalog: Catalog) -> BoxedFilter<(Response,)> {
    let updates = warp::path!("api" / "updates")
        .and(warp::get())
        .and(with_catalog(catalog))
        .and_then(|catalog: Catalog| async move { respond(catalog.updates.list()) });

    let time = warp::path!("api" / "time")
        .and(warp::get())
        .and_then(|| async move { respond(Ok::<_, CatalogError>(server_time())) });

    updates.or(time).unify().boxed()
}

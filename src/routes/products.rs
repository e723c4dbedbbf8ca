use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::config::FilteringSettings;
use crate::core::Catalog;
use crate::models::{
    ErrorResponse, FilterCriteria, FilterProductsRequest, FilterProductsResponse, HealthResponse,
    MarkersRequest, MarkersResponse, NearbyQuery, Product, SessionContext,
};
use crate::services::{BackendError, CacheError, CacheKey, MarketplaceClient, ProductCache};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<MarketplaceClient>,
    pub cache: ProductCache,
    pub catalog: Catalog,
    pub filtering: FilteringSettings,
}

/// Configure all product-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/products/filter", web::post().to(filter_products))
        .route("/products/markers", web::post().to(layout_markers))
        .route("/products/nearby", web::get().to(nearby_products))
        .route("/products/map", web::get().to(map_products))
        .route("/products/{product_id}", web::get().to(get_product))
        .route("/farmers/{farmer_id}/products", web::get().to(farmer_products));
}

/// Build the caller's session from request headers
///
/// `Authorization: Bearer <token>` supplies the token and `X-User-Id` the
/// user id; both are optional.
pub fn session_from_request(req: &HttpRequest) -> SessionContext {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let user_id = req
        .headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    SessionContext { user_id, token }
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn backend_error_response(err: &BackendError) -> HttpResponse {
    use actix_web::http::StatusCode;

    match err {
        BackendError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, "Not found", msg.clone()),
        BackendError::Unauthorized => {
            error_response(StatusCode::UNAUTHORIZED, "Unauthorized", err.to_string())
        }
        _ => error_response(StatusCode::BAD_GATEWAY, "Backend request failed", err.to_string()),
    }
}

fn filter_response(catalog: &Catalog, products: &[Product], criteria: &FilterCriteria) -> FilterProductsResponse {
    let result = catalog.filter(products, criteria);

    FilterProductsResponse {
        products: result.products,
        total_candidates: result.total_candidates,
        excluded_missing_location: result.missing_location,
    }
}

/// Load a product list, through the cache for anonymous callers
///
/// A caller carrying a token or user id may see listings others cannot, so
/// their fetches always go to the backend and are never stored.
async fn load_cached(
    state: &AppState,
    key: String,
    session: &SessionContext,
    farmer_id: Option<&str>,
) -> Result<Arc<Vec<Product>>, HttpResponse> {
    let backend = &state.backend;
    let fetch = || async move {
        match farmer_id {
            Some(id) => backend.list_farmer_products(session, id).await,
            None => backend.list_products(session).await,
        }
    };

    if !session.is_anonymous() {
        tracing::debug!("Bypassing cache for identified caller: {}", key);
        return fetch().await.map(Arc::new).map_err(|e| {
            tracing::error!("Failed to load products for {}: {}", key, e);
            backend_error_response(&e)
        });
    }

    let loaded = state.cache.get_or_fetch(&key, fetch).await;

    loaded.map_err(|CacheError::Fetch(e)| {
        tracing::error!("Failed to load products for {}: {}", key, e);
        backend_error_response(&e)
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = state.backend.health_check().await;

    let status = if backend_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.stats(),
    })
}

/// Filter a caller-supplied product list
///
/// POST /api/v1/products/filter
///
/// Request body:
/// ```json
/// {
///   "products": [{"productId": 1, "name": "Mango", "category": "fruits", "price": 10}],
///   "criteria": {
///     "category": "All",
///     "nameQuery": "",
///     "priceOrder": "LowToHigh",
///     "location": {"lat": 20.0, "lng": 80.0},
///     "radiusKm": 10
///   }
/// }
/// ```
async fn filter_products(
    state: web::Data<AppState>,
    req: web::Json<FilterProductsRequest>,
) -> impl Responder {
    use actix_web::http::StatusCode;

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for filter request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    if req.products.len() > state.filtering.max_products {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Too many products",
            format!(
                "At most {} products can be filtered per request",
                state.filtering.max_products
            ),
        );
    }

    let response = filter_response(&state.catalog, &req.products, &req.criteria);

    tracing::debug!(
        "Filtered {} of {} products",
        response.products.len(),
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Spread overlapping map markers
///
/// POST /api/v1/products/markers
async fn layout_markers(
    state: web::Data<AppState>,
    req: web::Json<MarkersRequest>,
) -> impl Responder {
    use actix_web::http::StatusCode;

    if req.products.len() > state.filtering.max_products {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Too many products",
            format!(
                "At most {} products can be laid out per request",
                state.filtering.max_products
            ),
        );
    }

    HttpResponse::Ok().json(MarkersResponse {
        products: state.catalog.layout_markers(&req.products),
    })
}

/// Fetch the marketplace listing and filter it
///
/// GET /api/v1/products/nearby?lat=20.0&lng=80.0&radiusKm=10&category=fruits&q=mango&priceOrder=LowToHigh
async fn nearby_products(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    match nearby(&state, query.into_inner(), &http_req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(response) => response,
    }
}

/// As `nearby`, with overlapping markers spread for map display
///
/// GET /api/v1/products/map?lat=20.0&lng=80.0&radiusKm=10
async fn map_products(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    match nearby(&state, query.into_inner(), &http_req).await {
        Ok(mut response) => {
            response.products = state.catalog.layout_markers(&response.products);
            HttpResponse::Ok().json(response)
        }
        Err(response) => response,
    }
}

async fn nearby(
    state: &AppState,
    query: NearbyQuery,
    http_req: &HttpRequest,
) -> Result<FilterProductsResponse, HttpResponse> {
    use actix_web::http::StatusCode;

    if let Err(errors) = query.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string()));
    }

    let session = session_from_request(http_req);
    let criteria = query.into_criteria(state.filtering.default_radius_km);

    let products = load_cached(state, CacheKey::products(), &session, None).await?;

    let response = filter_response(&state.catalog, &products, &criteria);

    tracing::info!(
        "Returning {} nearby products (from {} candidates, {} without location)",
        response.products.len(),
        response.total_candidates,
        response.excluded_missing_location
    );

    Ok(response)
}

/// Fetch and filter one farmer's listings
///
/// GET /api/v1/farmers/{farmer_id}/products?q=...&priceOrder=...
async fn farmer_products(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<NearbyQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    use actix_web::http::StatusCode;

    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let farmer_id = path.into_inner();
    let session = session_from_request(&http_req);
    let criteria = query.into_inner().into_criteria(state.filtering.default_radius_km);

    let key = CacheKey::farmer_products(&farmer_id);
    match load_cached(&state, key, &session, Some(&farmer_id)).await {
        Ok(products) => HttpResponse::Ok().json(filter_response(&state.catalog, &products, &criteria)),
        Err(response) => response,
    }
}

/// Fetch a single product
///
/// GET /api/v1/products/{product_id}
async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> impl Responder {
    let product_id = path.into_inner();
    let session = session_from_request(&http_req);

    match state.backend.get_product(&session, product_id).await {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(e) => {
            tracing::warn!("Failed to fetch product {}: {}", product_id, e);
            backend_error_response(&e)
        }
    }
}

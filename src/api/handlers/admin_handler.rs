//! Back-office handlers.
//!
//! Every route sits behind `admin_middleware`; the capability each action
//! needs is checked by the service.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AdminActionType, AdminGrant, Category, CategoryGrant, CategoryGrantUpdate, Listing,
    ListingPatch, ModificationRequest, NewCategory, NewSubCategory, NewTourTheme, NewTourType,
    Partner, PartnerAccessPatch, SubCategory, TourTheme, TourType, UserResponse,
    VerificationStatus,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GrantCapabilityRequest {
    pub action_type: AdminActionType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerificationRequest {
    pub status: VerificationStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommissionRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "Commission must be between 0 and 100"))]
    pub commission_rate: f64,
}

/// Category grant changes for one partner; omitted lists are kept.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryGrantRequest {
    pub category_id: Uuid,
    pub sub_category_ids: Option<Vec<Uuid>>,
    pub tour_type_ids: Option<Vec<Uuid>>,
    pub tour_theme_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectListingRequest {
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminListingUpdate {
    #[validate(nested)]
    pub changes: ListingPatch,
    /// Pending modification request approved by this update
    pub modification_request_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectModificationRequest {
    #[validate(length(min = 1, message = "Notes are required"))]
    pub notes: String,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // Administrators
        .route("/users/:id/promote", post(promote_to_admin))
        .route(
            "/admins/:id/grants",
            get(list_grants).post(grant_capability),
        )
        .route("/admins/:id/grants/:action", delete(revoke_capability))
        // Partners
        .route("/partners/:id/verification", patch(update_verification))
        .route("/partners/:id/commission", patch(update_commission))
        .route("/partners/:id/access", patch(update_access))
        .route("/partners/:id/categories", put(update_categories))
        // Listings
        .route("/listings/pending", get(list_pending_listings))
        .route("/listings/:id", patch(update_listing))
        .route("/listings/:id/approve", post(approve_listing))
        .route("/listings/:id/reject", post(reject_listing))
        .route(
            "/modification-requests/:id/reject",
            post(reject_modification_request),
        )
        // Catalog
        .route("/categories", post(create_category))
        .route("/sub-categories", post(create_sub_category))
        .route("/tour-types", post(create_tour_type))
        .route("/tour-themes", post(create_tour_theme))
}

/// Turn an account into an administrator (super admin only)
#[utoipa::path(
    post,
    path = "/admin/users/{id}/promote",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User promoted", body = UserResponse),
        (status = 403, description = "Super admin required"),
        (status = 409, description = "Already an administrator or a partner")
    )
)]
pub async fn promote_to_admin(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .admin_service
        .promote_to_admin(current_user.id, id)
        .await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Capabilities held by an administrator
#[utoipa::path(
    get,
    path = "/admin/admins/{id}/grants",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Administrator user ID")),
    responses((status = 200, description = "Grants", body = Vec<AdminGrant>))
)]
pub async fn list_grants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<AdminGrant>>>> {
    let grants = state.admin_service.list_grants(current_user.id, id).await?;
    Ok(Json(ApiResponse::success(grants)))
}

/// Grant a capability to an administrator
#[utoipa::path(
    post,
    path = "/admin/admins/{id}/grants",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Administrator user ID")),
    request_body = GrantCapabilityRequest,
    responses(
        (status = 201, description = "Capability granted", body = AdminGrant),
        (status = 400, description = "Target is not an administrator")
    )
)]
pub async fn grant_capability(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<GrantCapabilityRequest>,
) -> AppResult<Created<AdminGrant>> {
    let grant = state
        .admin_service
        .grant_capability(current_user.id, id, payload.action_type)
        .await?;
    Ok(Created(grant))
}

/// Revoke a capability
#[utoipa::path(
    delete,
    path = "/admin/admins/{id}/grants/{action}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Administrator user ID"),
        ("action" = AdminActionType, Path, description = "Capability")
    ),
    responses(
        (status = 204, description = "Capability revoked"),
        (status = 404, description = "Grant not found")
    )
)]
pub async fn revoke_capability(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((id, action)): Path<(Uuid, String)>,
) -> AppResult<NoContent> {
    let action: AdminActionType = action.parse()?;
    state
        .admin_service
        .revoke_capability(current_user.id, id, action)
        .await?;
    Ok(NoContent)
}

/// Approve or reject a partner
#[utoipa::path(
    patch,
    path = "/admin/partners/{id}/verification",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = VerificationRequest,
    responses((status = 200, description = "Partner updated", body = Partner))
)]
pub async fn update_verification(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<VerificationRequest>,
) -> AppResult<Json<ApiResponse<Partner>>> {
    let partner = state
        .partner_service
        .update_verification_status(current_user.id, id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(partner)))
}

/// Set a partner's commission
#[utoipa::path(
    patch,
    path = "/admin/partners/{id}/commission",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = CommissionRequest,
    responses((status = 200, description = "Partner updated", body = Partner))
)]
pub async fn update_commission(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CommissionRequest>,
) -> AppResult<Json<ApiResponse<Partner>>> {
    let partner = state
        .partner_service
        .update_commission(current_user.id, id, payload.commission_rate)
        .await?;
    Ok(Json(ApiResponse::success(partner)))
}

/// Change a partner's access flags
#[utoipa::path(
    patch,
    path = "/admin/partners/{id}/access",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = PartnerAccessPatch,
    responses((status = 200, description = "Partner updated", body = Partner))
)]
pub async fn update_access(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<PartnerAccessPatch>,
) -> AppResult<Json<ApiResponse<Partner>>> {
    let partner = state
        .partner_service
        .update_access(current_user.id, id, patch)
        .await?;
    Ok(Json(ApiResponse::success(partner)))
}

/// Set the catalog entries a partner may list under
#[utoipa::path(
    put,
    path = "/admin/partners/{id}/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = CategoryGrantRequest,
    responses(
        (status = 200, description = "Grant stored", body = CategoryGrant),
        (status = 400, description = "Sub-category outside the category")
    )
)]
pub async fn update_categories(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryGrantRequest>,
) -> AppResult<Json<ApiResponse<CategoryGrant>>> {
    let update = CategoryGrantUpdate {
        partner_id: id,
        category_id: payload.category_id,
        sub_category_ids: payload.sub_category_ids,
        tour_type_ids: payload.tour_type_ids,
        tour_theme_ids: payload.tour_theme_ids,
    };
    let grant = state
        .partner_service
        .update_categories(current_user.id, update)
        .await?;
    Ok(Json(ApiResponse::success(grant)))
}

/// Listings awaiting review
#[utoipa::path(
    get,
    path = "/admin/listings/pending",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Paginated pending listings"))
)]
pub async fn list_pending_listings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Listing>>>> {
    let (page, per_page) = (params.page, params.limit());
    let (listings, total) = state
        .listing_service
        .list_pending(current_user.id, params)
        .await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        listings, page, per_page, total,
    ))))
}

/// Publish a listing
#[utoipa::path(
    post,
    path = "/admin/listings/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, description = "Listing approved", body = Listing))
)]
pub async fn approve_listing(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let listing = state
        .listing_service
        .approve_listing(current_user.id, id)
        .await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// Reject a listing with a reason
#[utoipa::path(
    post,
    path = "/admin/listings/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = RejectListingRequest,
    responses((status = 200, description = "Listing rejected", body = Listing))
)]
pub async fn reject_listing(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RejectListingRequest>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let listing = state
        .listing_service
        .reject_listing(current_user.id, id, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// Edit a listing, optionally approving a modification request
#[utoipa::path(
    patch,
    path = "/admin/listings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = AdminListingUpdate,
    responses(
        (status = 200, description = "Listing updated", body = Listing),
        (status = 409, description = "Modification request already resolved")
    )
)]
pub async fn update_listing(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminListingUpdate>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let listing = state
        .listing_service
        .update_by_admin(
            current_user.id,
            id,
            payload.changes,
            payload.modification_request_id,
        )
        .await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// Reject a pending modification request
#[utoipa::path(
    post,
    path = "/admin/modification-requests/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Modification request ID")),
    request_body = RejectModificationRequest,
    responses(
        (status = 200, description = "Request rejected", body = ModificationRequest),
        (status = 409, description = "Request already resolved")
    )
)]
pub async fn reject_modification_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RejectModificationRequest>,
) -> AppResult<Json<ApiResponse<ModificationRequest>>> {
    let request = state
        .listing_service
        .reject_modification_request(current_user.id, id, payload.notes)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

/// Create a top-level category
#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> AppResult<Created<Category>> {
    let category = state
        .catalog_service
        .create_category(current_user.id, payload)
        .await?;
    Ok(Created(category))
}

/// Create a sub-category
#[utoipa::path(
    post,
    path = "/admin/sub-categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = NewSubCategory,
    responses((status = 201, description = "Sub-category created", body = SubCategory))
)]
pub async fn create_sub_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewSubCategory>,
) -> AppResult<Created<SubCategory>> {
    let sub_category = state
        .catalog_service
        .create_sub_category(current_user.id, payload)
        .await?;
    Ok(Created(sub_category))
}

/// Create a tour type
#[utoipa::path(
    post,
    path = "/admin/tour-types",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = NewTourType,
    responses((status = 201, description = "Tour type created", body = TourType))
)]
pub async fn create_tour_type(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewTourType>,
) -> AppResult<Created<TourType>> {
    let tour_type = state
        .catalog_service
        .create_tour_type(current_user.id, payload)
        .await?;
    Ok(Created(tour_type))
}

/// Create a tour theme
#[utoipa::path(
    post,
    path = "/admin/tour-themes",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = NewTourTheme,
    responses((status = 201, description = "Tour theme created", body = TourTheme))
)]
pub async fn create_tour_theme(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewTourTheme>,
) -> AppResult<Created<TourTheme>> {
    let theme = state
        .catalog_service
        .create_tour_theme(current_user.id, payload)
        .await?;
    Ok(Created(theme))
}

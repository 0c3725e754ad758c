use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Saleflow API",
        version = "0.1.0",
        description = "Retail sales recording service: tiered quantity discounts, \
                       customer/branch/product resolution and sale-created event publishing."
    ),
    paths(
        crate::handlers::sales::create_sale,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::activate_sale,
        crate::handlers::sales::deactivate_sale,
        crate::handlers::sales::suspend_sale,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::get_customer_by_name,
        crate::handlers::customers::delete_customer,
        crate::handlers::branches::create_branch,
        crate::handlers::branches::get_branch,
        crate::handlers::branches::get_branch_by_name,
        crate::handlers::branches::delete_branch,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::get_product_by_name,
        crate::handlers::products::delete_product,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::errors::FieldError,
        crate::entities::customer::CustomerStatus,
        crate::entities::sale::SaleStatus,
        crate::services::customers::CustomerRef,
        crate::services::branches::BranchRef,
        crate::services::products::ProductRef,
        crate::services::sales::CreateSaleRequest,
        crate::services::sales::SaleLineRequest,
        crate::services::sales::SaleLineResponse,
        crate::services::sales::PartyResponse,
        crate::services::sales::SaleResponse,
        crate::handlers::customers::CustomerResponse,
        crate::handlers::branches::BranchResponse,
        crate::handlers::products::ProductResponse,
    )),
    tags(
        (name = "sales", description = "Sale creation and lifecycle"),
        (name = "customers", description = "Customer store"),
        (name = "branches", description = "Branch store"),
        (name = "products", description = "Product catalog store"),
    )
)]
pub struct ApiDoc;

/// Mounts Swagger UI backed by the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{devices, health, phone_models, reports, sales, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dukani API",
        version = "0.3.0",
        description = "Phone Shop Inventory & Sales REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Dukani Team", email = "dev@dukani.co.ke")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Devices
        devices::add_device,
        devices::bulk_stock_update,
        devices::assign_devices,
        devices::list_assigned,
        devices::get_device,
        // Models
        phone_models::list_models,
        phone_models::create_model,
        // Sales
        sales::create_sale,
        sales::get_sale,
        // Reports
        reports::get_profit_report,
        reports::get_stock_report,
        // Settings
        settings::list_settings,
        settings::update_setting,
    ),
    components(
        schemas(
            // Devices
            crate::models::device::Device,
            crate::models::device::ScanItem,
            crate::models::device_status::DeviceStatus,
            devices::BulkIntakeRequest,
            devices::BulkIntakeResponse,
            devices::AssignDevicesRequest,
            devices::AssignDevicesResponse,
            // Models
            crate::models::phone_model::PhoneModel,
            crate::models::phone_model::CreatePhoneModel,
            // Sales
            crate::models::sale::Sale,
            crate::models::sale::SaleItem,
            crate::models::sale::SaleItemInput,
            crate::models::sale::CompletedSale,
            sales::CreateSaleRequest,
            sales::CreateSaleResponse,
            // Reports
            crate::models::report::DailyProfit,
            crate::models::report::StockReport,
            // Settings
            crate::models::configuration::Configuration,
            settings::UpdateConfigurationRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "devices", description = "Device inventory and assignment"),
        (name = "models", description = "Phone model catalog"),
        (name = "sales", description = "Sale commitment"),
        (name = "reports", description = "Sales and stock reporting"),
        (name = "settings", description = "Application configuration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

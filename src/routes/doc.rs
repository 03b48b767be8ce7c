use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{ErrorDetail, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        categories::CategoryRequest,
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        orders::{CreateOrderRequest, UpdateOrderRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        suppliers::SupplierRequest,
    },
    models::{Category, Customer, Order, Product, Supplier},
    query::{SortDirection, SortKey},
    routes::{auth, categories, customers, health, orders, products, suppliers},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order
    ),
    components(
        schemas(
            Product,
            Category,
            Supplier,
            Customer,
            Order,
            SortKey,
            SortDirection,
            ErrorDetail,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisterResponse,
            CreateProductRequest,
            UpdateProductRequest,
            CategoryRequest,
            SupplierRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateOrderRequest,
            UpdateOrderRequest,
            health::HealthData
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login and registration"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Suppliers", description = "Supplier endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

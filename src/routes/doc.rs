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
        cart::{CartAction, CartView, EditCartRequest},
        disputes::{ChoiceList, CreateChoiceRequest, DisputeList, FileDisputeRequest, RecordDecisionRequest},
        orders::OrderList,
        products::{
            CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList,
            PropertyValueRequest, SetPropertiesRequest, UpdateProductRequest,
        },
    },
    models::{
        CartLine, Category, Dispute, DisputeChoice, Order, OrderLine, Product, ProductDetail, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, categories, disputes, health, orders, params,
        products as product_routes,
    },
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
        product_routes::list_products,
        product_routes::get_product,
        categories::list_categories,
        cart::cart_view,
        cart::edit_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        disputes::list_disputes,
        disputes::file_dispute,
        disputes::get_dispute,
        admin::list_all_disputes,
        admin::record_decision,
        admin::list_choices,
        admin::create_choice,
        admin::create_category,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::set_properties
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            ProductDetail,
            CartLine,
            Order,
            OrderLine,
            Dispute,
            DisputeChoice,
            CartAction,
            CartView,
            EditCartRequest,
            FileDisputeRequest,
            RecordDecisionRequest,
            CreateChoiceRequest,
            CreateCategoryRequest,
            CreateProductRequest,
            UpdateProductRequest,
            PropertyValueRequest,
            SetPropertiesRequest,
            ProductList,
            CategoryList,
            OrderList,
            DisputeList,
            ChoiceList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::DisputeListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<Dispute>,
            ApiResponse<DisputeList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalogue product endpoints"),
        (name = "Categories", description = "Catalogue category endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Disputes", description = "Dispute endpoints"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

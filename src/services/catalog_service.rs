use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, ProductList},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        property_values::{Column as PropValCol, Entity as PropertyValues},
        ProductProperties,
    },
    error::{AppError, AppResult},
    models::{Category, Product, ProductDetail},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();

    // Customer listings only ever show products that are in sale.
    let mut condition = Condition::all().add(ProdCol::InSale.eq(true));

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ProdCol::Name).ilike(pattern.clone()))
                .add(Expr::col(ProdCol::Description).ilike(pattern)),
        );
    }

    if let Some(slug) = query.category.as_ref().filter(|s| !s.is_empty()) {
        let category = Categories::find()
            .filter(CategoryCol::Slug.eq(slug.clone()))
            .one(&state.orm)
            .await?;
        let category = match category {
            Some(c) => c,
            None => return Err(AppError::NotFound),
        };
        condition = condition.add(ProdCol::CategoryId.eq(category.id));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let sort_col = match sort_by {
        ProductSortBy::Name => ProdCol::Name,
        ProductSortBy::Price => ProdCol::Price,
        ProductSortBy::CreatedAt => ProdCol::CreatedAt,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .find_also_related(Categories)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| {
            let category = category.map(|c| c.name).unwrap_or_default();
            product_from_entity(product, category)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, slug: &str) -> AppResult<ApiResponse<ProductDetail>> {
    let found = Products::find()
        .filter(ProdCol::Slug.eq(slug))
        .filter(ProdCol::InSale.eq(true))
        .find_also_related(Categories)
        .one(&state.orm)
        .await?;
    let (product, category) = match found {
        Some(pair) => pair,
        None => return Err(AppError::NotFound),
    };

    let properties = property_strings(&state.orm, product.id).await?;
    let detail = ProductDetail {
        id: product.id,
        name: product.name,
        slug: product.slug,
        category: category.map(|c| c.name).unwrap_or_default(),
        description: product.description,
        price: product.price,
        in_sale: product.in_sale,
        properties,
    };

    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<CategoryList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Categories::find().order_by_asc(CategoryCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| Category {
            id: c.id,
            name: c.name,
            slug: c.slug,
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

/// Property list of a product, each entry rendered as "PropertyName: Value"
/// and sorted by property name. Shared with the checkout snapshot builder.
pub(crate) async fn property_strings<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<Vec<String>> {
    let mut props: Vec<String> = PropertyValues::find()
        .filter(PropValCol::ProductId.eq(product_id))
        .find_also_related(ProductProperties)
        .all(conn)
        .await?
        .into_iter()
        .filter_map(|(value, property)| property.map(|p| format!("{}: {}", p.name, value.value)))
        .collect();
    props.sort();
    Ok(props)
}

pub(crate) fn product_from_entity(model: ProductModel, category: String) -> Product {
    Product {
        id: model.id,
        name: model.name,
        slug: model.slug,
        category,
        description: model.description,
        price: model.price,
        in_sale: model.in_sale,
    }
}

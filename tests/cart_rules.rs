use axum_storefront_api::dto::cart::parse_quantity;
use axum_storefront_api::models::OrderLine;
use axum_storefront_api::routes::params::Pagination;
use uuid::Uuid;

#[test]
fn quantity_parses_plain_integers() {
    assert_eq!(parse_quantity(Some("3")), 3);
    assert_eq!(parse_quantity(Some(" 12 ")), 12);
    assert_eq!(parse_quantity(Some("0")), 0);
}

#[test]
fn malformed_quantity_counts_as_zero() {
    assert_eq!(parse_quantity(None), 0);
    assert_eq!(parse_quantity(Some("")), 0);
    assert_eq!(parse_quantity(Some("abc")), 0);
    assert_eq!(parse_quantity(Some("1.5")), 0);
    assert_eq!(parse_quantity(Some("-2")), 0);
}

// The serialized order line is the durable format stored in orders.items;
// its field set must not drift.
#[test]
fn order_line_wire_shape_is_stable() {
    let id = Uuid::new_v4();
    let line = OrderLine {
        id,
        name: "Ferris TKL".into(),
        category: "Keyboards".into(),
        price: 12_900,
        in_sale: true,
        properties: vec!["Switches: Brown tactile".into()],
        quantity: 2,
    };

    let value = serde_json::to_value(&line).expect("serialize order line");
    assert_eq!(
        value,
        serde_json::json!({
            "id": id,
            "name": "Ferris TKL",
            "category": "Keyboards",
            "price": 12_900,
            "in_sale": true,
            "properties": ["Switches: Brown tactile"],
            "quantity": 2,
        })
    );

    let parsed: OrderLine = serde_json::from_value(value).expect("parse order line");
    assert_eq!(parsed.quantity, 2);
    assert_eq!(parsed.price, 12_900);
}

#[test]
fn pagination_normalizes_out_of_range_input() {
    let pagination = Pagination {
        page: Some(0),
        per_page: Some(1000),
    };
    let (page, per_page, offset) = pagination.normalize();
    assert_eq!(page, 1);
    assert_eq!(per_page, 100);
    assert_eq!(offset, 0);

    let defaults = Pagination {
        page: None,
        per_page: None,
    };
    assert_eq!(defaults.normalize(), (1, 20, 0));
}

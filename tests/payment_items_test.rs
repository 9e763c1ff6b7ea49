//! Integration tests for payment items and category filter expansion.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use financebook::models::{PaymentItemWithRelations, Recipient};
use serde_json::json;

#[tokio::test]
async fn test_filter_by_parent_includes_descendant_tags() {
    let client = TestClient::new();
    let (area, food, restaurants, fast_food) = client.food_tree().await;
    let rent = client.create_category(area.id, "Rent", None, None).await;

    let burger = client.create_item(-899, "Burger", &[fast_food.id]).await;
    client.create_item(-120000, "March rent", &[rent.id]).await;

    let items = client
        .list_items(&format!("/payment-items?category_ids={}", food.id))
        .await;
    let ids: Vec<i64> = items.iter().map(|i| i.item.id).collect();
    assert_eq!(ids, vec![burger.item.id]);

    let items = client
        .list_items(&format!("/payment-items?category_ids={}", restaurants.id))
        .await;
    assert_eq!(items.len(), 1);

    let items = client
        .list_items(&format!(
            "/payment-items?category_ids={},{}",
            fast_food.id, rent.id
        ))
        .await;
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_empty_selection_means_no_category_filter() {
    let client = TestClient::new();
    let (_, _, _, fast_food) = client.food_tree().await;

    client.create_item(-899, "Burger", &[fast_food.id]).await;
    client.create_item(-500, "Untagged", &[]).await;

    // No selection matches everything, not "items without categories"
    let all = client.list_items("/payment-items").await;
    assert_eq!(all.len(), 2);

    let all = client.list_items("/payment-items?category_ids=").await;
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_item_without_categories_gets_unclassified() {
    let client = TestClient::new();

    let item = client.create_item(-500, "Coffee", &[]).await;
    assert_eq!(item.categories.len(), 1);
    assert_eq!(item.categories[0].name, "UNCLASSIFIED");
}

#[tokio::test]
async fn test_one_category_per_type_except_standard() {
    let client = TestClient::new();
    let (_, food, _, fast_food) = client.food_tree().await;

    let (status, _) = client
        .post_json(
            "/payment-items",
            json!({
                "amount_cents": -100,
                "date": "2024-03-01",
                "category_ids": [food.id, fast_food.id],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, types) = client.get("/category-types").await;
    let standard_id = types
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "standard")
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let travel = client
        .create_category(standard_id, "Travel", None, None)
        .await;
    let work = client.create_category(standard_id, "Work", None, None).await;

    let item = client
        .create_item(-100, "Train", &[travel.id, work.id, food.id])
        .await;
    assert_eq!(item.categories.len(), 3);
}

#[tokio::test]
async fn test_unknown_category_or_recipient_is_404() {
    let client = TestClient::new();

    let (status, _) = client
        .post_json(
            "/payment-items",
            json!({ "amount_cents": -100, "date": "2024-03-01", "category_ids": [999] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client
        .post_json(
            "/payment-items",
            json!({ "amount_cents": -100, "date": "2024-03-01", "recipient_id": 999 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expense_and_income_filters() {
    let client = TestClient::new();
    client.create_item(-2500, "Groceries", &[]).await;
    client.create_item(300000, "Salary", &[]).await;

    let expenses = client.list_items("/payment-items?expense_only=true").await;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].item.description.as_deref(), Some("Groceries"));

    let income = client.list_items("/payment-items?income_only=true").await;
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].item.description.as_deref(), Some("Salary"));

    let (status, _) = client
        .get("/payment-items?expense_only=true&income_only=true")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_item() {
    let client = TestClient::new();
    let (_, food, _, fast_food) = client.food_tree().await;
    let item = client.create_item(-899, "Burger", &[fast_food.id]).await;

    let (status, body) = client
        .put_json(
            &format!("/payment-items/{}", item.item.id),
            json!({ "amount_cents": -999, "category_ids": [food.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated: PaymentItemWithRelations = serde_json::from_value(body).unwrap();
    assert_eq!(updated.item.amount_cents, -999);
    assert_eq!(updated.item.description.as_deref(), Some("Burger"));
    let category_ids: Vec<i64> = updated.categories.iter().map(|c| c.id).collect();
    assert_eq!(category_ids, vec![food.id]);

    let (status, _) = client
        .put_json(
            &format!("/payment-items/{}", item.item.id),
            json!({ "date": "not-a-date" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = client
        .delete(&format!("/payment-items/{}", item.item.id))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = client
        .get(&format!("/payment-items/{}", item.item.id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = client
        .delete(&format!("/payment-items/{}", item.item.id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_icon_comes_from_category_ancestors() {
    let client = TestClient::new();
    let (_, _, _, fast_food) = client.food_tree().await;
    let burger = client.create_item(-899, "Burger", &[fast_food.id]).await;
    let coffee = client.create_item(-300, "Coffee", &[]).await;

    let (_, body) = client
        .get(&format!("/payment-items/{}/icon", burger.item.id))
        .await;
    assert_eq!(body, json!({ "icon_file": "food.png" }));

    let (_, body) = client
        .get(&format!("/payment-items/{}/icon", coffee.item.id))
        .await;
    assert_eq!(body, json!({ "icon_file": null }));
}

#[tokio::test]
async fn test_recipients() {
    let client = TestClient::new();

    let (status, body) = client
        .post_json(
            "/recipients",
            json!({ "name": "Landlord", "address": "1 Main St" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let landlord: Recipient = serde_json::from_value(body).unwrap();

    let (status, _) = client.post_json("/recipients", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client
        .post_json(
            "/payment-items",
            json!({
                "amount_cents": -120000,
                "date": "2024-03-01",
                "recipient_id": landlord.id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let item: PaymentItemWithRelations = serde_json::from_value(body).unwrap();
    assert_eq!(item.recipient, Some(landlord.clone()));

    let (status, _) = client.get(&format!("/recipients/{}", landlord.id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = client.get("/recipients/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

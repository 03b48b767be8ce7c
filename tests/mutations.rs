mod common;

use std::{sync::Mutex, time::Duration};

use inventory_client::{
    client::{
        ApiClient, CredentialStore, ErrorKind, FlashBoard, MutationGateway, MutationStatus,
        RemoteCollectionView, Resource, ResourceConfig, SessionGate,
    },
    dto::{
        categories::CategoryRequest,
        customers::CreateCustomerRequest,
        orders::CreateOrderRequest,
    },
    models::Category,
};

use common::{
    ADMIN_PASSWORD, settle, signed_in_store, spawn_backend, spawn_seeded_backend, store,
};

fn category(name: &str) -> CategoryRequest {
    CategoryRequest { name: name.into() }
}

#[tokio::test]
async fn created_item_appears_after_the_refresh() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;
    let categories = store.categories();

    let result = categories.create(&category("Bakery")).await;
    assert!(result.success(), "{result:?}");
    assert_eq!(result.message.as_deref(), Some("Category created"));

    let names: Vec<String> = categories.view().items().await.into_iter().map(|c| c.name).collect();
    assert!(names.contains(&"Bakery".to_string()));
    assert_eq!(categories.view().total_count().await, 3);
    assert!(
        server
            .db
            .read()
            .await
            .audit_log
            .iter()
            .any(|entry| entry.action == "category_create" && entry.username == "admin")
    );

    assert_eq!(
        store.flash().current().await.success.as_deref(),
        Some("Category created")
    );
    settle(Duration::from_millis(400)).await;
    assert_eq!(store.flash().current().await.success, None);
    Ok(())
}

#[tokio::test]
async fn create_returns_to_the_first_page_and_update_stays() -> anyhow::Result<()> {
    let server = spawn_backend().await?;
    {
        let mut tables = server.db.write().await;
        for n in 0..20 {
            let id = tables.next_category_id();
            tables.categories.push(Category {
                id,
                name: format!("Category {n:02}"),
            });
        }
    }
    let store = signed_in_store(&server).await?;
    let categories = store.categories();

    categories.view().go_to_page(1).await?;
    let target = categories.view().items().await[0].clone();
    let result = categories
        .update(target.id, &category("Category 09 renamed"))
        .await;
    assert!(result.success(), "{result:?}");
    assert_eq!(categories.view().query().await.page_offset, 9);
    assert_eq!(
        categories.view().find(target.id).await.map(|c| c.name).as_deref(),
        Some("Category 09 renamed")
    );

    categories.view().go_to_page(2).await?;
    let result = categories.create(&category("Another")).await;
    assert!(result.success(), "{result:?}");
    assert_eq!(categories.view().query().await.page_offset, 0);
    assert_eq!(categories.view().total_count().await, 21);
    Ok(())
}

#[tokio::test]
async fn deleting_a_category_in_use_is_a_conflict() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;
    let categories = store.categories();
    categories.view().refresh().await?;

    let prompt = Mutex::new(None);
    let confirm = |text: &str| {
        *prompt.lock().unwrap() = Some(text.to_string());
        true
    };
    let result = categories.remove(1, &confirm).await;

    assert_eq!(result.status, MutationStatus::Failed(ErrorKind::Conflict));
    assert_eq!(
        result.message.as_deref(),
        Some("Cannot delete the category because it has associated products")
    );
    assert_eq!(
        prompt.lock().unwrap().as_deref(),
        Some("Delete this category? It cannot be deleted while products use it.")
    );
    assert_eq!(
        store.flash().current().await.error,
        result.message
    );

    categories.view().refresh().await?;
    assert!(categories.view().find(1).await.is_some());
    assert_eq!(categories.view().total_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn declined_delete_sends_nothing() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;

    let result = store.products().remove(3, &|_: &str| false).await;
    assert_eq!(result.status, MutationStatus::Declined);
    assert_eq!(server.db.read().await.products.len(), 3);
    Ok(())
}

#[tokio::test]
async fn deleting_a_product_refreshes_the_public_catalog() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;
    store.catalog().refresh().await?;
    assert_eq!(store.catalog().total_count().await, 3);

    let result = store.products().remove(3, &|_: &str| true).await;
    assert!(result.success(), "{result:?}");
    assert_eq!(result.message.as_deref(), Some("Product deleted"));
    assert_eq!(store.products().view().total_count().await, 2);
    assert_eq!(store.catalog().total_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn anonymous_mutations_are_refused_locally() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = store(&server)?;

    let result = store.categories().create(&category("Bakery")).await;
    assert_eq!(
        result.status,
        MutationStatus::Failed(ErrorKind::MissingCredential)
    );
    assert_eq!(result.message.as_deref(), Some("Sign in to continue"));

    let result = store.categories().remove(1, &|_: &str| true).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::MissingCredential));
    assert_eq!(server.db.read().await.categories.len(), 2);
    Ok(())
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_sending() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;

    let result = store.categories().create(&category("   ")).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Validation));
    assert_eq!(server.db.read().await.categories.len(), 2);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_surfaces_the_server_detail() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;

    let result = store.categories().create(&category("dairy")).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Http));
    assert_eq!(result.message.as_deref(), Some("The category already exists"));
    Ok(())
}

#[tokio::test]
async fn order_lifecycle_refreshes_dependent_views() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;

    let result = store
        .customers()
        .create(&CreateCustomerRequest {
            name: "Ana Ruiz".into(),
            email: "ana@example.com".into(),
            phone: Some("5551234".into()),
        })
        .await;
    assert!(result.success(), "{result:?}");
    let customer = store.customers().view().items().await[0].clone();

    let result = store
        .orders()
        .create(&CreateOrderRequest {
            customer_id: customer.id,
            product_id: 1,
            quantity: 2,
            status: None,
            notes: None,
        })
        .await;
    assert!(result.success(), "{result:?}");

    let orders = store.orders().view().items().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "pending");
    assert_eq!(orders[0].total(), 17000.0);
    // Products and customers are reloaded alongside the orders.
    assert_eq!(store.products().view().total_count().await, 3);
    assert_eq!(store.customers().view().total_count().await, 1);

    let result = store.orders().update_status(orders[0].id, "completed").await;
    assert!(result.success(), "{result:?}");
    assert_eq!(
        store.orders().view().find(orders[0].id).await.map(|o| o.status).as_deref(),
        Some("completed")
    );

    let result = store.orders().update_status(orders[0].id, "lost").await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Validation));

    let result = store.customers().remove(customer.id, &|_: &str| true).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Conflict));
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_keeps_the_loaded_items() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = signed_in_store(&server).await?;
    let orders = store.orders().view();

    store
        .customers()
        .create(&CreateCustomerRequest {
            name: "Luis Paz".into(),
            email: "luis@example.com".into(),
            phone: None,
        })
        .await;
    store
        .orders()
        .create(&CreateOrderRequest {
            customer_id: 1,
            product_id: 2,
            quantity: 1,
            status: None,
            notes: Some("Sliced".into()),
        })
        .await;
    assert_eq!(orders.items().await.len(), 1);

    store.credentials().set("not-a-token").await;
    let err = orders.refresh().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(orders.items().await.len(), 1);
    assert!(orders.last_error().await.is_some());
    Ok(())
}

#[tokio::test]
async fn failed_refresh_after_a_mutation_keeps_the_success() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let api = ApiClient::new(&server.base_url)?;
    let credentials = CredentialStore::new();
    let flash = FlashBoard::new(Duration::from_millis(150));
    let session = SessionGate::new(api.clone(), credentials.clone(), flash.clone(), Vec::new());
    session.login("admin", ADMIN_PASSWORD).await?;

    // The listing insists on a token it is never given, so every refresh fails.
    let config = ResourceConfig {
        listing_requires_credential: true,
        send_credential: false,
        ..Resource::Categories.config()
    };
    let view: RemoteCollectionView<Category> =
        RemoteCollectionView::new(api.clone(), config, credentials, 9, Duration::from_millis(40));
    let gateway = MutationGateway::new(api, session, view.clone(), flash.clone());

    let result = gateway.create(&category("Bakery")).await;
    assert!(result.success(), "{result:?}");
    assert_eq!(view.last_error().await.as_deref(), Some("Sign in to continue"));
    assert!(!view.is_loading().await);
    assert_eq!(flash.current().await.success.as_deref(), Some("Category created"));
    assert_eq!(server.db.read().await.categories.len(), 3);
    Ok(())
}

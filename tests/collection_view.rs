mod common;

use std::time::Duration;

use inventory_client::{
    client::{AppStore, ApiClient, CredentialStore, ErrorKind, RemoteCollectionView, Resource},
    models::Category,
    query::{ListQuery, SortDirection, SortKey},
};

use common::{
    settle, spawn_backend, spawn_recording_stub, spawn_seeded_backend, spawn_slow_stub, store,
};

fn categories_view(
    base_url: &str,
    debounce: Duration,
) -> anyhow::Result<RemoteCollectionView<Category>> {
    Ok(RemoteCollectionView::new(
        ApiClient::new(base_url)?,
        Resource::Categories.config(),
        CredentialStore::new(),
        9,
        debounce,
    ))
}

#[tokio::test]
async fn refresh_sends_one_request_encoding_the_query() -> anyhow::Result<()> {
    let stub = spawn_recording_stub(42).await?;
    let view = categories_view(&stub.base_url, Duration::from_millis(60))?;

    let mut query = ListQuery::new(9).with_filter("dairy").at_page(2);
    query.sort_direction = SortDirection::Desc;
    let page = view.refresh_with(query).await?;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0];
    assert_eq!(params["q"], "dairy");
    assert_eq!(params["offset"], "18");
    assert_eq!(params["limit"], "9");
    assert_eq!(params["sort"], "name");
    assert_eq!(params["order"], "desc");

    assert_eq!(page.total_count, 42);
    assert_eq!(view.total_count().await, 42);
    assert_eq!(view.page_count().await, 5);
    assert!(!view.is_loading().await);
    Ok(())
}

#[tokio::test]
async fn rapid_filter_changes_issue_a_single_request() -> anyhow::Result<()> {
    let stub = spawn_recording_stub(1).await?;
    let view = categories_view(&stub.base_url, Duration::from_millis(80))?;

    view.set_filter("a").await;
    view.set_filter("ab").await;
    view.set_filter("abc").await;
    assert!(stub.requests().is_empty());

    settle(Duration::from_millis(400)).await;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["q"], "abc");
    assert_eq!(requests[0]["offset"], "0");
    assert_eq!(view.items().await[0].name, "abc");
    Ok(())
}

#[tokio::test]
async fn filter_change_returns_to_first_page() -> anyhow::Result<()> {
    let stub = spawn_recording_stub(40).await?;
    let view = categories_view(&stub.base_url, Duration::from_millis(40))?;

    view.go_to_page(3).await?;
    assert_eq!(view.query().await.page_offset, 27);

    view.set_filter("ham").await;
    assert_eq!(view.query().await.page_offset, 0);
    settle(Duration::from_millis(250)).await;

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1]["offset"], "0");
    Ok(())
}

#[tokio::test]
async fn page_navigation_supersedes_a_pending_filter_refresh() -> anyhow::Result<()> {
    let stub = spawn_recording_stub(40).await?;
    let view = categories_view(&stub.base_url, Duration::from_millis(80))?;

    view.set_filter("ham").await;
    view.go_to_page(1).await?;
    settle(Duration::from_millis(300)).await;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["q"], "ham");
    assert_eq!(requests[0]["offset"], "9");
    Ok(())
}

#[tokio::test]
async fn unsupported_sort_key_is_refused_without_a_request() -> anyhow::Result<()> {
    let stub = spawn_recording_stub(1).await?;
    let view = categories_view(&stub.base_url, Duration::from_millis(40))?;

    let err = view
        .set_sort(SortKey::Price, SortDirection::Asc)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(stub.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn refreshing_twice_yields_the_same_page() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = store(&server)?;
    let catalog = store.catalog();

    let first = catalog.refresh().await?;
    let second = catalog.refresh().await?;

    assert_eq!(first, second);
    assert_eq!(first.total_count, 3);
    Ok(())
}

#[tokio::test]
async fn catalog_sorts_by_price_descending() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = store(&server)?;
    let catalog = store.catalog();

    catalog.set_sort(SortKey::Price, SortDirection::Desc).await?;
    let names: Vec<String> = catalog.items().await.into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Smoked ham", "Farm cheese", "Butter"]);

    catalog.toggle_direction().await?;
    assert_eq!(catalog.items().await[0].name, "Butter");
    Ok(())
}

async fn insert_categories(server: &common::TestServer, count: usize) {
    let mut tables = server.db.write().await;
    for n in 0..count {
        let id = tables.next_category_id();
        tables.categories.push(Category {
            id,
            name: format!("Category {n:02}"),
        });
    }
}

#[tokio::test]
async fn twenty_five_items_span_three_pages_of_nine() -> anyhow::Result<()> {
    let server = spawn_backend().await?;
    insert_categories(&server, 25).await;
    let store = store(&server)?;
    let view = store.categories().view();

    view.refresh().await?;
    assert_eq!(view.page_count().await, 3);
    assert_eq!(view.items().await.len(), 9);

    view.go_to_page(2).await?;
    let state = view.snapshot().await;
    assert_eq!(state.query.page_offset, 18);
    assert!(state.page.items.len() <= 7);
    assert_eq!(state.page.items.len(), 7);
    assert!(!state.has_next());
    assert!(state.has_previous());

    // Already on the last page: nothing moves.
    view.next_page().await?;
    assert_eq!(view.page_index().await, 2);

    view.previous_page().await?;
    assert_eq!(view.page_index().await, 1);
    assert_eq!(view.items().await[0].name, "Category 09");
    Ok(())
}

#[tokio::test]
async fn offset_past_the_end_returns_no_items_and_the_same_total() -> anyhow::Result<()> {
    let server = spawn_backend().await?;
    insert_categories(&server, 25).await;
    let store = store(&server)?;
    let view = store.categories().view();

    let page = view.refresh_with(ListQuery::new(9).at_page(10)).await?;
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 25);
    Ok(())
}

#[tokio::test]
async fn unreachable_server_and_missing_credential_are_reported() -> anyhow::Result<()> {
    let server = spawn_seeded_backend().await?;
    let store = store(&server)?;
    let catalog = store.catalog();
    catalog.refresh().await?;

    let unreachable: RemoteCollectionView<Category> =
        categories_view("http://127.0.0.1:9", Duration::from_millis(40))?;
    let err = unreachable.refresh().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(
        unreachable.last_error().await.as_deref(),
        Some("Could not reach the server")
    );
    assert!(!unreachable.is_loading().await);

    // An anonymous orders listing is refused locally and leaves products alone.
    let orders = store.orders().view();
    let err = orders.refresh().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);
    assert_eq!(catalog.items().await.len(), 3);
    Ok(())
}

#[tokio::test]
async fn far_page_index_yields_an_empty_page() -> anyhow::Result<()> {
    let server = spawn_backend().await?;
    insert_categories(&server, 25).await;
    let store = store(&server)?;
    let view = store.categories().view();
    view.refresh().await?;

    let page = view.go_to_page(u64::MAX / 4).await?;
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 25);

    let state = view.snapshot().await;
    assert_eq!(state.query.page_offset, u64::MAX);
    assert!(!state.has_next());
    Ok(())
}

#[tokio::test]
async fn view_reports_loading_while_a_refresh_is_outstanding() -> anyhow::Result<()> {
    let base_url = spawn_slow_stub(Duration::from_millis(300)).await?;
    let view = categories_view(&base_url, Duration::from_millis(40))?;
    assert!(!view.is_loading().await);

    let pending = tokio::spawn({
        let view = view.clone();
        async move { view.refresh().await }
    });
    settle(Duration::from_millis(100)).await;
    assert!(view.is_loading().await);
    assert!(view.items().await.is_empty());

    let page = pending.await??;
    assert_eq!(page.total_count, 1);
    assert!(!view.is_loading().await);
    assert_eq!(view.items().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn response_arriving_after_logout_is_discarded() -> anyhow::Result<()> {
    let base_url = spawn_slow_stub(Duration::from_millis(300)).await?;
    let store = AppStore::new(&common::client_config(&base_url))?;
    assert_eq!(store.api().base_url(), base_url);
    let view = store.categories().view().clone();

    let pending = tokio::spawn({
        let view = view.clone();
        async move { view.refresh().await }
    });
    settle(Duration::from_millis(100)).await;
    assert!(view.is_loading().await);

    store.logout().await;
    assert!(!view.is_loading().await);

    // The request itself still completes.
    let page = pending.await??;
    assert_eq!(page.total_count, 1);
    assert!(view.items().await.is_empty());
    assert_eq!(view.total_count().await, 0);
    assert!(!view.is_loading().await);
    Ok(())
}

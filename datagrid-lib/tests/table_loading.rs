//! Fetch lifecycle of a table: loading, filters, pagination, errors and
//! out-of-order responses.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use datagrid_lib::source::{self, Page};
use datagrid_lib::table::BodyView;
use datagrid_lib::{
    Column, DataSource, DataTable, FetchError, Filters, LoadOutcome, MemorySource, TableStatus,
};
use tokio::sync::oneshot;

use common::{Product, catalog_source, default_filters, product};

fn columns() -> Vec<Column<Product>> {
    vec![
        Column::new("name", "Name").sortable(),
        Column::new("category", "Category"),
        Column::new("price", "Price")
            .render(|p: &Product, _| format!("${:.2}", p.price))
            .sortable(),
    ]
}

fn product_table(source: impl DataSource<Product> + 'static) -> DataTable<Product> {
    DataTable::builder(source)
        .columns(columns())
        .page_size(5)
        .filters(default_filters())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_initial_load() {
    let table = product_table(catalog_source());
    assert_eq!(table.status(), TableStatus::Idle);
    assert_eq!(table.view().body, BodyView::Empty);

    let outcome = table.load().await;

    assert_eq!(outcome, LoadOutcome::Applied { rows: 5, total: 12 });
    assert_eq!(table.status(), TableStatus::Success);
    assert_eq!(table.total(), 12);
    assert_eq!(table.total_pages(), 3);
    assert_eq!(
        table.rows().iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[tokio::test]
async fn test_mutation_enters_loading_synchronously() {
    let table = product_table(catalog_source());
    let pending = table.load();

    assert!(table.is_loading());
    assert_eq!(table.view().body, BodyView::Loading);

    pending.await;
    assert!(!table.is_loading());
}

#[tokio::test]
async fn test_filter_change_returns_to_first_page() {
    let table = product_table(catalog_source());
    table.load().await;
    table.change_page(3).await;
    assert_eq!(table.page(), 3);

    let outcome = table.set_filter("category", "Books").await;

    assert_eq!(outcome, LoadOutcome::Applied { rows: 4, total: 4 });
    assert_eq!(table.page(), 1);
    assert_eq!(table.total_pages(), 1);
    assert!(table.rows().iter().all(|p| p.category == "Books"));
}

#[tokio::test]
async fn test_price_range_updates_in_one_notification() {
    let notifications = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&notifications);
    let table = DataTable::builder(catalog_source())
        .columns(columns())
        .page_size(5)
        .filters(default_filters())
        .on_filter_change(move |filters: &Filters| {
            assert!(filters.contains_key("minPrice") && filters.contains_key("maxPrice"));
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    table
        .update_filters(Filters::new().with("minPrice", 50).with("maxPrice", 200))
        .await;

    assert_eq!(notifications.load(Ordering::SeqCst), 1);
    let mut prices: Vec<f64> = table.rows().iter().map(|p| p.price).collect();
    prices.sort_by(f64::total_cmp);
    assert_eq!(prices, vec![59.0, 79.0, 120.0, 189.5]);
}

#[tokio::test]
async fn test_filter_change_handler_can_read_the_table() {
    let handle: Arc<OnceLock<DataTable<Product>>> = Arc::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (reader, sink) = (Arc::clone(&handle), Arc::clone(&seen));
    let table = DataTable::builder(catalog_source())
        .columns(columns())
        .page_size(5)
        .filters(default_filters())
        .on_filter_change(move |filters: &Filters| {
            let Some(table) = reader.get() else { return };
            let current = table.filters();
            sink.lock().unwrap().push((
                filters.get_str("category").map(str::to_string),
                current.get_str("category").map(str::to_string),
                table.page(),
                table.is_loading(),
            ));
        })
        .build()
        .unwrap();
    handle.set(table.clone()).unwrap();
    table.load().await;
    table.next_page().await;

    let pending = table.set_filter("category", "Books");
    assert_eq!(
        seen.lock().unwrap().clone(),
        vec![(Some("Books".to_string()), Some("Books".to_string()), 1, true)]
    );
    pending.await;
    assert_eq!(table.total(), 4);
}

#[tokio::test]
async fn test_query_params_drop_blank_filters() {
    let table = product_table(catalog_source());

    let params = table.query_params();

    assert!(!params.contains_key("search"));
    assert_eq!(params["category"].to_string(), "All");
    assert_eq!(params["minPrice"].to_string(), "0");
    assert_eq!(params["maxPrice"].to_string(), "1000");
    assert_eq!(table.query_string(), "category=All&maxPrice=1000&minPrice=0");
}

#[tokio::test]
async fn test_reset_and_remove_filters() {
    let table = product_table(catalog_source());
    table.load().await;
    table.set_filter("category", "Furniture").await;
    table.set_filter("search", "lamp").await;
    assert_eq!(table.total(), 1);

    table.remove_filter("search").await;
    assert!(!table.filters().contains_key("search"));
    assert_eq!(table.total(), 4);

    table.reset_filters().await;
    assert_eq!(table.filters(), default_filters());
    assert_eq!(table.total(), 12);
}

#[tokio::test]
async fn test_out_of_range_page_is_skipped() {
    let table = product_table(catalog_source());
    table.load().await;

    assert_eq!(table.change_page(0).await, LoadOutcome::Skipped);
    assert_eq!(table.change_page(4).await, LoadOutcome::Skipped);
    assert_eq!(table.prev_page().await, LoadOutcome::Skipped);
    assert_eq!(table.page(), 1);

    table.change_page(3).await;
    assert_eq!(table.next_page().await, LoadOutcome::Skipped);
    assert_eq!(table.rows().len(), 2);
}

#[tokio::test]
async fn test_page_size_change_clamps_page() {
    let table = product_table(catalog_source());
    table.load().await;
    table.change_page(3).await;

    let outcome = table.change_page_size(10).await;

    assert_eq!(outcome, LoadOutcome::Applied { rows: 2, total: 12 });
    assert_eq!(table.page(), 2);
    assert_eq!(table.total_pages(), 2);
    assert_eq!(table.change_page_size(0).await, LoadOutcome::Skipped);
    assert_eq!(table.page_size(), 10);
}

#[tokio::test]
async fn test_oversized_page_is_rendered_as_returned() {
    let source = source::from_fn(|_filters, _page, _page_size| async {
        let rows = (1..=8).map(|id| product(id, "Item", "Misc", 1.0)).collect();
        Ok::<_, FetchError>(Page::new(rows, 8))
    });
    let table = product_table(source);

    table.load().await;

    assert_eq!(table.rows().len(), 8);
    assert_eq!(table.view().rows().len(), 8);
    assert_eq!(table.total_pages(), 2);
}

#[tokio::test]
async fn test_failed_load_surfaces_error() {
    let source = Arc::new(catalog_source());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&errors);
    let table = DataTable::builder(Arc::clone(&source))
        .columns(columns())
        .page_size(5)
        .on_error(move |error: &FetchError| seen.lock().unwrap().push(error.to_string()))
        .build()
        .unwrap();
    table.load().await;

    source.fail_next(FetchError::transport("connection refused"));
    let outcome = table.next_page().await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed("Transport error: connection refused".to_string())
    );
    assert_eq!(table.status(), TableStatus::Error);
    assert_eq!(
        table.view().body,
        BodyView::Error("Transport error: connection refused".to_string())
    );
    assert_eq!(errors.lock().unwrap().len(), 1);
    // The last good page is kept, and the table stays operable.
    assert_eq!(table.rows().len(), 5);

    let outcome = table.refresh().await;
    assert_eq!(outcome, LoadOutcome::Applied { rows: 5, total: 12 });
    assert!(table.error().is_none());
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let table = product_table(catalog_source());

    table.set_filter("search", "nothing like this").await;

    assert_eq!(table.status(), TableStatus::Success);
    assert_eq!(table.view().body, BodyView::Empty);
    assert_eq!(table.total_pages(), 0);
}

/// Books queries block until the gate opens (or fail if it is dropped);
/// everything else answers at once.
fn gated_source(
    gate: oneshot::Receiver<()>,
) -> impl DataSource<Product> + 'static {
    let gate = Arc::new(Mutex::new(Some(gate)));
    let rows = Arc::new(MemorySource::new(common::catalog()).with_filter(common::matches));
    source::from_fn(move |filters: Filters, page, page_size| {
        let wait = if filters.get_str("category") == Some("Books") {
            gate.lock().unwrap().take()
        } else {
            None
        };
        let rows = Arc::clone(&rows);
        async move {
            if let Some(wait) = wait
                && wait.await.is_err()
            {
                return Err(FetchError::transport("gate closed"));
            }
            rows.fetch(&filters, page, page_size).await
        }
    })
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let (open, gate) = oneshot::channel();
    let table = product_table(gated_source(gate));

    let stale = tokio::spawn(table.set_filter("category", "Books"));
    let fresh = table.set_filter("category", "Furniture").await;
    open.send(()).unwrap();
    let stale = stale.await.unwrap();

    assert_eq!(fresh, LoadOutcome::Applied { rows: 4, total: 4 });
    assert_eq!(stale, LoadOutcome::Superseded);
    assert!(table.rows().iter().all(|p| p.category == "Furniture"));
    assert_eq!(table.status(), TableStatus::Success);
}

#[tokio::test]
async fn test_superseded_failure_does_not_report() {
    let (open, gate) = oneshot::channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let table = DataTable::builder(gated_source(gate))
        .columns(columns())
        .on_error(move |_: &FetchError| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let stale = tokio::spawn(table.set_filter("category", "Books"));
    table.set_filter("category", "Electronics").await;
    drop(open);

    assert_eq!(stale.await.unwrap(), LoadOutcome::Superseded);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(table.rows().iter().all(|p| p.category == "Electronics"));
}

#[tokio::test]
async fn test_dropped_load_returns_to_last_committed_state() {
    let table = product_table(catalog_source());
    table.load().await;

    let older = table.refresh();
    drop(table.change_page(2));

    assert_eq!(older.await, LoadOutcome::Superseded);
    assert_eq!(table.status(), TableStatus::Success);
    assert_eq!(table.page(), 1);
    assert_eq!(
        table.rows().iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );

    // The table is still usable afterwards.
    assert_eq!(
        table.change_page(2).await,
        LoadOutcome::Applied { rows: 5, total: 12 }
    );
}

#[tokio::test]
async fn test_dropping_a_superseded_load_keeps_the_newer_one() {
    let table = product_table(catalog_source());
    table.load().await;

    let older = table.next_page();
    let newer = table.change_page(3);
    drop(older);

    assert!(table.is_loading());
    assert_eq!(table.page(), 3);
    assert_eq!(newer.await, LoadOutcome::Applied { rows: 2, total: 12 });
    assert_eq!(table.status(), TableStatus::Success);
}

#[tokio::test]
async fn test_dropped_first_load_returns_to_idle() {
    let table = product_table(catalog_source());

    drop(table.load());

    assert_eq!(table.status(), TableStatus::Idle);
    assert_eq!(table.view().body, BodyView::Empty);
}

#[tokio::test]
async fn test_last_page_with_unknown_total_does_not_overflow() {
    let table = product_table(catalog_source());

    let pending = table.change_page(usize::MAX);
    assert_eq!(table.pagination_params().offset, usize::MAX);
    assert_eq!(table.next_page().await, LoadOutcome::Skipped);
    drop(pending);

    assert_eq!(table.page(), 1);
}


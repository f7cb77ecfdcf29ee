//! Scripted walkthroughs over the mock data sets.

use std::sync::Arc;

use datagrid_lib::table::ColumnWidth;
use datagrid_lib::{
    BulkAction, Column, DataTable, FetchError, Filters, LoadOutcome, MemorySource, RowAction,
    TableConfig, TableRow,
};
use log::{info, warn};
use serde::Serialize;

use crate::CliError;
use crate::catalog::{self, Product, User};

fn step<T: TableRow>(title: &str, outcome: Option<LoadOutcome>, table: &DataTable<T>) {
    println!("== {title}");
    if let Some(outcome) = outcome {
        println!("   {outcome:?}");
    }
    if table.query_string().is_empty() {
        println!("   query: (none)");
    } else {
        println!("   query: ?{}", table.query_string());
    }
    println!("{}", table.view());
}

/// Prints every stored row as JSON.
fn export_json<T: TableRow + Serialize>(source: &MemorySource<T>) {
    match serde_json::to_string_pretty(&source.rows()) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Export failed: {}", e),
    }
}

pub async fn products(config: TableConfig) -> Result<(), CliError> {
    let source = Arc::new(catalog::product_source());
    let removed = Arc::clone(&source);
    let exported = Arc::clone(&source);
    let restocked = Arc::clone(&source);

    let table = DataTable::builder(Arc::clone(&source))
        .column(Column::new("id", "ID"))
        .column(Column::new("name", "Name").sortable().width(ColumnWidth::Fixed(24)))
        .column(Column::new("category", "Category"))
        .column(
            Column::new("price", "Price")
                .render(|p: &Product, _| format!("${:.2}", p.price))
                .sortable(),
        )
        .column(Column::new("inStock", "Stock").render(|p: &Product, _| {
            String::from(if p.in_stock { "In stock" } else { "Out" })
        }))
        .config(config)
        .filters(catalog::product_filters())
        .on_filter_change(|filters: &Filters| info!("Filters changed: {} set", filters.len()))
        .on_create(|| info!("Create product requested"))
        .on_edit(|p: &Product| info!("Edit product {}", p.id))
        .on_delete(move |p: &Product| {
            if removed.remove(&p.id).is_some() {
                info!("Deleted product {} ({})", p.id, p.name);
            }
        })
        .on_export(move || export_json(&exported))
        .on_error(|e: &FetchError| warn!("Product fetch failed: {}", e))
        .action(
            RowAction::new("Restock", move |p: &Product| {
                let mut row = p.clone();
                row.in_stock = true;
                restocked.update(row);
            })
            .when(|p: &Product| !p.in_stock),
        )
        .bulk_action(BulkAction::new("Compare", |rows: &[Product]| {
            let names: Vec<&str> = rows.iter().map(|p| p.name.as_str()).collect();
            info!("Comparing {}", names.join(", "));
        }))
        .build()?;

    let outcome = table.load().await;
    step("Initial load", Some(outcome), &table);

    let outcome = table.set_filter("category", "Electronics").await;
    step("Category: Electronics", Some(outcome), &table);

    let outcome = table
        .update_filters(Filters::new().with("minPrice", 30).with("maxPrice", 100))
        .await;
    step("Price range 30..100", Some(outcome), &table);

    let outcome = table.reset_filters().await;
    step("Reset filters", Some(outcome), &table);

    let outcome = table.next_page().await;
    step("Next page", Some(outcome), &table);

    table.toggle_sort("price");
    table.toggle_sort("price");
    step("Sort by price, descending", None, &table);

    table.toggle_select_all();
    step("Select all on page", None, &table);
    table.run_bulk_action("Compare")?;

    if let Some(first) = table.rows().first() {
        table.delete(&first.key())?;
    }
    let outcome = table.refresh().await;
    step("Delete first row and refresh", Some(outcome), &table);

    let out_of_stock = table.rows().into_iter().find(|p| !p.in_stock);
    if let Some(product) = out_of_stock {
        table.run_action("Restock", &product.key())?;
        let outcome = table.refresh().await;
        step("Restock and refresh", Some(outcome), &table);
    }

    source.fail_next(FetchError::rejected(503, "catalog service unavailable"));
    let outcome = table.change_page(1).await;
    step("Simulated failure", Some(outcome), &table);

    let outcome = table.refresh().await;
    step("Retry", Some(outcome), &table);

    table.export()?;
    Ok(())
}

pub async fn users(config: TableConfig) -> Result<(), CliError> {
    let source = Arc::new(catalog::user_source());
    let activated = Arc::clone(&source);
    let deactivated = Arc::clone(&source);

    let table = DataTable::builder(Arc::clone(&source))
        .column(Column::new("name", "Name").sortable())
        .column(Column::new("email", "Email"))
        .column(Column::new("role", "Role").sortable())
        .column(Column::new("active", "Status").render(|u: &User, _| {
            String::from(if u.active { "active" } else { "inactive" })
        }))
        .config(config)
        .filters(catalog::user_filters())
        .on_view(|u: &User| info!("View user {}", u.id))
        .on_edit(|u: &User| info!("Edit user {}", u.id))
        .on_error(|e: &FetchError| warn!("User fetch failed: {}", e))
        .action(
            RowAction::new("Activate", move |u: &User| {
                let mut row = u.clone();
                row.active = true;
                activated.update(row);
            })
            .when(|u: &User| !u.active),
        )
        .bulk_action(BulkAction::new("Deactivate", move |rows: &[User]| {
            for user in rows {
                let mut row = user.clone();
                row.active = false;
                deactivated.update(row);
            }
        }))
        .build()?;

    let outcome = table.load().await;
    step("Initial load", Some(outcome), &table);

    let outcome = table.set_filter("role", "user").await;
    step("Role: user", Some(outcome), &table);

    let outcome = table.set_filter("status", "inactive").await;
    step("Status: inactive", Some(outcome), &table);

    if let Some(first) = table.rows().first() {
        table.run_action("Activate", &first.key())?;
    }
    let outcome = table.refresh().await;
    step("Activate first and refresh", Some(outcome), &table);

    let outcome = table.remove_filter("status").await;
    step("Dismiss status filter", Some(outcome), &table);

    table.toggle_sort("name");
    table.toggle_select_all();
    table.run_bulk_action("Deactivate")?;
    let outcome = table.refresh().await;
    step("Deactivate all and refresh", Some(outcome), &table);

    let outcome = table.change_page_size(25).await;
    step("Page size 25", Some(outcome), &table);
    Ok(())
}

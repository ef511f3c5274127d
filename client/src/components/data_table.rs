//! Column-driven table with client-side search and pagination.
//!
//! DESIGN
//! ======
//! All filtering and paging lives in `state::table::TableView`; this component
//! only binds it to inputs and renders the current `PageSlice`. Search runs on
//! every keystroke against every field of a row, not just visible columns.

#[cfg(test)]
#[path = "data_table_test.rs"]
mod data_table_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use serde_json::Value;

use crate::state::table::{DEFAULT_PAGE_SIZE, PageSlice, TableView, cell_text};

/// Custom cell rendering: `(cell value, whole row)`.
pub type CellRenderer = Arc<dyn Fn(&Value, &Value) -> AnyView + Send + Sync>;

#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub render: Option<CellRenderer>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), render: None }
    }

    #[must_use]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &Value) -> AnyView + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Raw field value; missing fields read as null.
    pub fn value<'a>(&self, row: &'a Value) -> &'a Value {
        row.get(self.key.as_str()).unwrap_or(&Value::Null)
    }

    fn cell(&self, row: &Value) -> AnyView {
        let value = self.value(row);
        match &self.render {
            Some(render) => render(value, row),
            None => cell_text(value).into_any(),
        }
    }
}

pub fn page_label(slice: &PageSlice) -> String {
    format!("Page {} of {}", slice.page.max(1), slice.total_pages.max(1))
}

pub fn result_label(slice: &PageSlice) -> String {
    match slice.filtered_count {
        1 => "1 result".to_owned(),
        n => format!("{n} results"),
    }
}

#[component]
pub fn DataTable(
    columns: Vec<Column>,
    #[prop(into)] data: Signal<Vec<Value>>,
    #[prop(default = DEFAULT_PAGE_SIZE)] page_size: usize,
    #[prop(optional, into)] empty_message: Option<String>,
) -> impl IntoView {
    let table = RwSignal::new(TableView::new(page_size));
    let slice = Memo::new(move |_| data.with(|rows| table.with(|t| t.slice(rows))));
    let column_count = columns.len().to_string();
    let columns = StoredValue::new(columns);
    let empty_message = empty_message.unwrap_or_else(|| "No records found".to_owned());

    let on_search = move |ev: leptos::ev::Event| {
        let term = event_target_value(&ev);
        table.update(|t| t.set_search(&term));
    };
    let on_previous = move |_| data.with_untracked(|rows| table.update(|t| t.previous(rows)));
    let on_next = move |_| data.with_untracked(|rows| table.update(|t| t.next(rows)));

    let header = columns.with_value(|cols| {
        cols.iter()
            .map(|c| view! { <th class="data-table__heading">{c.label.clone()}</th> })
            .collect_view()
    });

    let body = move || {
        let page = slice.get();
        if page.rows.is_empty() {
            return view! {
                <tr>
                    <td class="data-table__empty" colspan=column_count.clone()>
                        {empty_message.clone()}
                    </td>
                </tr>
            }
            .into_any();
        }
        page.rows
            .iter()
            .map(|row| {
                let cells = columns.with_value(|cols| {
                    cols.iter().map(|c| view! { <td>{c.cell(row)}</td> }).collect_view()
                });
                view! { <tr>{cells}</tr> }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="data-table">
            <div class="data-table__toolbar">
                <input
                    class="data-table__search"
                    type="search"
                    placeholder="Search..."
                    prop:value=move || table.get().search_term
                    on:input=on_search
                />
                <span class="data-table__count">{move || result_label(&slice.get())}</span>
            </div>
            <table class="data-table__table">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
            <div class="data-table__pager">
                <button class="btn" disabled=move || !slice.get().has_previous() on:click=on_previous>
                    "Previous"
                </button>
                <span class="data-table__page">{move || page_label(&slice.get())}</span>
                <button class="btn" disabled=move || !slice.get().has_next() on:click=on_next>
                    "Next"
                </button>
            </div>
        </div>
    }
}

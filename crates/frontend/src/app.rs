use crate::usecases::u508_bulk_product_create::BulkProductEditor;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <BulkProductEditor />
    }
}

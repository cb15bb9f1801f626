//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Clothing Recommender"</h1>
            <p class="text-muted">"Upload a photo to detect tags and find similar items"</p>
        </header>
    }
}

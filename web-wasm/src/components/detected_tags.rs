//! 検出タグ

use clothing_recommender_common::Tag;
use leptos::prelude::*;

/// タグが空の間は何も表示しない
#[component]
pub fn DetectedTags(tags: Memo<Vec<Tag>>) -> impl IntoView {
    view! {
        <Show when=move || tags.with(|t| !t.is_empty())>
            <section class="detected-tags">
                <h2>"Detected Tags:"</h2>
                <ul class="tag-list">
                    {move || tags.get().into_iter().map(|tag| view! {
                        <li class="tag">{tag.to_string()}</li>
                    }).collect_view()}
                </ul>
            </section>
        </Show>
    }
}

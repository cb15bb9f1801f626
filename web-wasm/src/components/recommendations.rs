//! 類似アイテム一覧

use clothing_recommender_common::{format_similarity, join_tags, RecommendationItem};
use leptos::prelude::*;

#[component]
pub fn Recommendations(items: Memo<Vec<RecommendationItem>>) -> impl IntoView {
    view! {
        <Show when=move || items.with(|i| !i.is_empty())>
            <section class="recommendations">
                <h2>"Similar Items:"</h2>
                <div class="recommendation-grid">
                    <For
                        each=move || items.get().into_iter().enumerate()
                        key=|(i, item)| (*i, item.id.clone())
                        children=move |(_, item)| view! { <RecommendationCard item=item /> }
                    />
                </div>
            </section>
        </Show>
    }
}

#[component]
fn RecommendationCard(item: RecommendationItem) -> impl IntoView {
    view! {
        <div class="recommendation-card">
            <p class="filename">{item.filename.clone()}</p>
            <p class="similarity">"Similarity: " {format_similarity(item.similarity_score)}</p>
            <p class="tags">
                <strong>"Tags:"</strong>
                " "
                {join_tags(&item.tags)}
            </p>
        </div>
    }
}

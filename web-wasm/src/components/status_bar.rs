//! ステータス表示コンポーネント

use clothing_recommender_common::Phase;
use leptos::prelude::*;

#[component]
pub fn StatusBar(phase: Memo<Phase>, error_message: Memo<Option<String>>) -> impl IntoView {
    view! {
        <div class="status-container">
            <Show when=move || phase.get() != Phase::Idle>
                <p class=move || format!("status status-{}", phase.get().as_str())>
                    {move || phase.get().label()}
                </p>
            </Show>
            <Show when=move || error_message.with(|m| m.is_some())>
                <div class="error-message" role="alert">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>
        </div>
    }
}

//! 操作ボタンコンポーネント

use clothing_recommender_common::Phase;
use leptos::prelude::*;

#[component]
pub fn ActionButtons<FS, FT, FC, FX>(
    phase: Memo<Phase>,
    has_image: Memo<bool>,
    on_submit: FS,
    on_tag_only: FT,
    on_cancel: FC,
    on_clear: FX,
) -> impl IntoView
where
    FS: Fn(()) + Send + Sync + 'static + Clone,
    FT: Fn(()) + Send + Sync + 'static + Clone,
    FC: Fn(()) + Send + Sync + 'static + Clone,
    FX: Fn(()) + Send + Sync + 'static + Clone,
{
    let busy = move || phase.get().is_in_flight();

    view! {
        <div class="action-buttons">
            <button
                class="btn btn-primary"
                disabled=move || !has_image.get() || busy()
                on:click={
                    let on_submit = on_submit.clone();
                    move |_| on_submit(())
                }
            >
                {move || submit_label(phase.get())}
            </button>

            <button
                class="btn btn-secondary"
                disabled=move || !has_image.get() || busy()
                on:click={
                    let on_tag_only = on_tag_only.clone();
                    move |_| on_tag_only(())
                }
            >
                "Tags only"
            </button>

            <Show when=move || has_image.get() && !busy()>
                <button
                    class="btn btn-secondary"
                    on:click={
                        let on_clear = on_clear.clone();
                        move |_| on_clear(())
                    }
                >
                    "Clear"
                </button>
            </Show>

            <Show when=busy>
                <button
                    class="btn btn-secondary"
                    on:click={
                        let on_cancel = on_cancel.clone();
                        move |_| on_cancel(())
                    }
                >
                    "Cancel"
                </button>
            </Show>
        </div>
    }
}

fn submit_label(phase: Phase) -> &'static str {
    if phase.is_in_flight() {
        "Processing..."
    } else {
        "Get Recommendations"
    }
}

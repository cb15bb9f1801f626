//! メインアプリケーションコンポーネント

use crate::api::backend::FetchClient;
use crate::components::{
    action_buttons::ActionButtons,
    detected_tags::DetectedTags,
    header::Header,
    recommendations::Recommendations,
    status_bar::StatusBar,
    upload_area::UploadArea,
};
use crate::store::SignalStore;
use clothing_recommender_common::{ImagePayload, Outcome, Workflow};
use leptos::prelude::*;
use leptos::task::spawn_local;

type AppWorkflow = Workflow<FetchClient, SignalStore>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let store = SignalStore::new();
    let session = store.signal();
    let workflow: AppWorkflow = Workflow::new(FetchClient::from_page(), store);

    // 表示用の派生状態
    let phase = Memo::new(move |_| session.with(|s| s.phase()));
    let has_image = Memo::new(move |_| session.with(|s| s.selected_image().is_some()));
    let selected = Memo::new(move |_| {
        session.with(|s| {
            s.selected_image()
                .map(|image| (image.filename.clone(), image.to_data_url()))
        })
    });
    let tags = Memo::new(move |_| session.with(|s| s.detected_tags().to_vec()));
    let items = Memo::new(move |_| session.with(|s| s.recommendations().to_vec()));
    let error_message = Memo::new(move |_| session.with(|s| s.error_message().map(str::to_string)));

    let on_image_selected = {
        let workflow = workflow.clone();
        move |image: ImagePayload| workflow.select_image(image)
    };

    let on_submit = {
        let workflow = workflow.clone();
        move |_| {
            let workflow = workflow.clone();
            spawn_local(async move {
                let outcome = workflow.submit().await;
                log_outcome("submit", &outcome);
            });
        }
    };

    let on_tag_only = {
        let workflow = workflow.clone();
        move |_| {
            let workflow = workflow.clone();
            spawn_local(async move {
                let outcome = workflow.tag_only().await;
                log_outcome("tag", &outcome);
            });
        }
    };

    let on_cancel = {
        let workflow = workflow.clone();
        move |_| {
            workflow.cancel();
        }
    };

    let on_clear = {
        let workflow = workflow.clone();
        move |_| workflow.clear_image()
    };

    view! {
        <div class="container">
            <Header />

            <UploadArea selected=selected on_image_selected=on_image_selected />

            <ActionButtons
                phase=phase
                has_image=has_image
                on_submit=on_submit
                on_tag_only=on_tag_only
                on_cancel=on_cancel
                on_clear=on_clear
            />

            <StatusBar phase=phase error_message=error_message />

            <DetectedTags tags=tags />

            <Recommendations items=items />
        </div>
    }
}

fn log_outcome(action: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Completed => {
            gloo::console::log!(format!("{}: completed", action));
        }
        Outcome::Failed(stage) => {
            gloo::console::warn!(format!("{}: {} failed", action, stage.as_str()));
        }
        other => {
            gloo::console::log!(format!("{}: {:?}", action, other));
        }
    }
}

//! アップロードエリアコンポーネント

use clothing_recommender_common::ImagePayload;
use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileReader};

#[component]
pub fn UploadArea<F>(
    selected: Memo<Option<(String, String)>>,
    on_image_selected: F,
) -> impl IntoView
where
    F: Fn(ImagePayload) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let on_drop = {
        let on_image_selected = on_image_selected.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(|files| files.get(0)) {
                read_file(file, on_image_selected.clone());
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_change = {
        let on_image_selected = on_image_selected.clone();
        move |ev: web_sys::Event| {
            let Some(input) = ev
                .target()
                .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                read_file(file, on_image_selected.clone());
            }
            // 同じファイルを再選択しても change が発火するように
            input.set_value("");
        }
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                type="file"
                accept="image/jpeg,image/png,image/webp,image/gif"
                style="display: none"
                node_ref=input_ref
                on:change=on_change
                on:click=|ev| ev.stop_propagation()
            />
            <Show
                when=move || selected.with(|s| s.is_some())
                fallback=|| view! {
                    <div class="upload-icon">"📷"</div>
                    <p>"Drag & drop a photo or click to choose"</p>
                    <p class="text-muted">"Supported: JPEG, PNG, WebP, GIF (max 10 MB)"</p>
                }
            >
                <img
                    class="preview"
                    alt="Selected image"
                    src=move || selected.with(|s| s.as_ref().map(|(_, url)| url.clone()).unwrap_or_default())
                />
                <p class="file-name">
                    {move || selected.with(|s| s.as_ref().map(|(name, _)| name.clone()).unwrap_or_default())}
                </p>
            </Show>
        </div>
    }
}

fn read_file<F>(file: File, on_image_selected: F)
where
    F: Fn(ImagePayload) + 'static,
{
    let file_name = file.name();
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            gloo::console::error!(format!("FileReader unavailable: {:?}", e));
            return;
        }
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let data_url = reader_clone.result().ok().and_then(|result| result.as_string());
        match data_url.and_then(|url| ImagePayload::from_data_url(file_name.clone(), &url)) {
            Some(image) => on_image_selected(image),
            None => {
                gloo::console::error!(format!("failed to read {}", file_name));
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        gloo::console::error!(format!("read_as_data_url failed: {:?}", e));
    }
}

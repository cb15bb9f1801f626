//! シグナルで保持するセッション

use clothing_recommender_common::{Event, RequestToken, Session, SessionStore};
use leptos::prelude::*;

/// `RwSignal<Session>` を `SessionStore` として扱う
///
/// コンポーネント破棄後に完了したリクエストは反映しない
#[derive(Debug, Clone, Copy)]
pub struct SignalStore(pub RwSignal<Session>);

impl SignalStore {
    pub fn new() -> Self {
        Self(RwSignal::new(Session::new()))
    }

    pub fn signal(&self) -> RwSignal<Session> {
        self.0
    }
}

impl SessionStore for SignalStore {
    fn snapshot(&self) -> Session {
        self.0.try_get_untracked().unwrap_or_default()
    }

    fn apply(&self, event: Event) -> bool {
        self.0.try_update(|session| session.apply(event)).unwrap_or(false)
    }

    fn current_token(&self) -> RequestToken {
        self.0
            .try_with_untracked(|session| session.issued_token())
            .unwrap_or_default()
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use clothing_recommender_common::{Phase, Tag, UploadResult};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_signal_store_applies_events() {
        let store = SignalStore::new();
        assert!(store.apply(Event::UploadStarted));
        let token = store.current_token();
        assert_eq!(store.snapshot().phase(), Phase::Uploading);

        let result = UploadResult {
            id: None,
            filename: None,
            tags: vec![Tag::from("shirt")],
        };
        assert!(store.apply(Event::UploadSucceeded { token, result }));
        assert_eq!(store.signal().get_untracked().detected_tags(), &[Tag::from("shirt")]);
    }

    #[wasm_bindgen_test]
    fn test_signal_store_ignores_stale_token() {
        let store = SignalStore::new();
        store.apply(Event::UploadStarted);
        let stale = store.current_token();
        store.apply(Event::UploadStarted);

        let result = UploadResult {
            id: Some("1".to_string()),
            filename: None,
            tags: vec![Tag::from("old")],
        };
        assert!(!store.apply(Event::UploadSucceeded { token: stale, result }));
        assert!(store.snapshot().detected_tags().is_empty());
    }
}

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

const TOAST_LIFETIME_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Clone)]
struct ToastEntry {
    id: u64,
    level: ToastLevel,
    message: String,
}

/// Очередь всплывающих уведомлений, живёт в контексте приложения.
#[derive(Clone, Copy)]
pub struct ToastService {
    queue: RwSignal<Vec<ToastEntry>>,
    next_id: RwSignal<u64>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into());
    }

    fn push(&self, level: ToastLevel, message: String) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        if level == ToastLevel::Error {
            log::error!("{message}");
        }
        self.queue.update(|q| q.push(ToastEntry { id, level, message }));

        let queue = self.queue;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_LIFETIME_MS).await;
            queue.update(|q| q.retain(|t| t.id != id));
        });
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let svc = use_context::<ToastService>()
        .expect("ToastService not provided in context (provide it in app root)");

    view! {
        <div class="toast-stack">
            <For
                each=move || svc.queue.get()
                key=|entry| entry.id
                children=move |entry| {
                    let class = match entry.level {
                        ToastLevel::Success => "toast toast--success",
                        ToastLevel::Error => "toast toast--error",
                    };
                    view! { <div class=class>{entry.message.clone()}</div> }
                }
            />
        </div>
    }
}

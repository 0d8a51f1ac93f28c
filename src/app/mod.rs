use crate::pages::{AppLayout, BidEditingPage, BidGenerationPage, OutlineEditorPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Each screen owns its own outline store; AppLayout reads the location.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("") view=move || view! {
                    <AppLayout>
                        <BidGenerationPage />
                    </AppLayout>
                } />
                <Route path=path!("editing") view=move || view! {
                    <AppLayout>
                        <BidEditingPage />
                    </AppLayout>
                } />
                <Route path=path!("outline") view=move || view! {
                    <AppLayout>
                        <OutlineEditorPage />
                    </AppLayout>
                } />
            </Routes>
        </Router>
    }
}

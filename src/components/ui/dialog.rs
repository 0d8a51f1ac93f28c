use leptos::prelude::*;
use leptos_ui::clx;

use crate::components::ui::button::{Button, ButtonSize, ButtonVariant};

mod components {
    use super::*;
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogHeader, div, "flex flex-col gap-2 text-center sm:text-left"}
    clx! {DialogTitle, h3, "text-lg leading-none font-semibold"}
    clx! {DialogDescription, p, "text-muted-foreground text-sm"}
    clx! {DialogFooter, footer, "flex flex-col-reverse gap-2 sm:flex-row sm:justify-end"}
}

#[allow(unused_imports)]
pub use components::*;

/// Modal confirmation bound to an `open` signal.
///
/// `on_confirm` runs before the dialog closes. Cancel, backdrop click and
/// Escape only close it.
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] description: Signal<String>,
    #[prop(into, default = "确认".to_string())] confirm_label: String,
    #[prop(optional)] destructive: bool,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let title = StoredValue::new(title);
    let confirm_label = StoredValue::new(confirm_label);

    let esc = window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.get_untracked() {
            open.set(false);
        }
    });
    on_cleanup(move || esc.remove());

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4"
                data-name="ConfirmDialogBackdrop"
                on:click=move |_| open.set(false)
            >
                <div
                    class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg"
                    role="alertdialog"
                    on:click=|ev| ev.stop_propagation()
                >
                    <DialogBody>
                        <DialogHeader>
                            <DialogTitle class={if destructive { "text-base text-destructive" } else { "text-base" }}>
                                {title.get_value()}
                            </DialogTitle>
                            <DialogDescription>{move || description.get()}</DialogDescription>
                        </DialogHeader>
                        <DialogFooter>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |_| open.set(false)
                            >
                                "取消"
                            </Button>
                            <Button
                                variant={if destructive { ButtonVariant::Destructive } else { ButtonVariant::Default }}
                                size=ButtonSize::Sm
                                on:click=move |_| {
                                    on_confirm.run(());
                                    open.set(false);
                                }
                            >
                                {confirm_label.get_value()}
                            </Button>
                        </DialogFooter>
                    </DialogBody>
                </div>
            </div>
        </Show>
    }
}

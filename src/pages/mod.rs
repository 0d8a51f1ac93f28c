use crate::catalog::{visible_rows, CatalogFlags, CatalogTree};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, ConfirmDialog, Label,
};
use crate::export::{to_json, to_outline_text};
use crate::outline::{self, find};
use crate::state::{sample_outline, AppContext, OutlineStore};
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr, strum::EnumIter)]
pub(crate) enum Screen {
    #[strum(serialize = "标书生成")]
    Generation,
    #[strum(serialize = "标书编辑")]
    Editing,
    #[strum(serialize = "目录编辑")]
    Outline,
}

impl Screen {
    pub fn path(self) -> &'static str {
        match self {
            Screen::Generation => "/",
            Screen::Editing => "/editing",
            Screen::Outline => "/outline",
        }
    }
}

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let location = use_location();
    let pathname = move || location.pathname.get();

    let tabs = <Screen as strum::IntoEnumIterator>::iter()
        .map(|screen| {
            let class = move || {
                if pathname() == screen.path() {
                    "rounded-md px-3 py-1.5 text-sm font-medium bg-accent text-accent-foreground"
                } else {
                    "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent/50"
                }
            };
            view! {
                <A href=screen.path() attr:class=class>
                    {screen.as_ref().to_string()}
                </A>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex w-full max-w-[1080px] items-center justify-between px-4 py-3">
                    <div class="space-y-0.5">
                        <div class="text-sm font-semibold">"标书工作台"</div>
                        <div class="text-xs text-muted-foreground">"Bid outline editor"</div>
                    </div>
                    <nav class="flex items-center gap-1">{tabs}</nav>
                </div>
            </header>
            <main class="mx-auto w-full max-w-[1080px] px-4 py-6">{children()}</main>
        </div>
    }
}

/// Confirmation shown before generated content is replaced.
#[component]
fn RegenerateDialog(store: OutlineStore) -> impl IntoView {
    let open = RwSignal::new(false);

    // Mirror the store's pending confirmation into the dialog's open flag.
    Effect::new(move |_| open.set(store.confirm_regenerate.get().is_some()));
    Effect::new(move |_| {
        if !open.get() {
            store.confirm_regenerate.set(None);
        }
    });

    let description = Signal::derive(move || {
        let title = store
            .confirm_regenerate
            .get()
            .and_then(|id| store.forest.with(|f| find(f, &id).map(|n| n.title().to_string())))
            .unwrap_or_default();
        format!("重新生成将覆盖“{title}”已有的内容，此操作不可撤销。")
    });

    view! {
        <ConfirmDialog
            open=open
            title="重新生成内容"
            description=description
            confirm_label="覆盖并生成"
            destructive=true
            on_confirm=Callback::new(move |_| store.confirm_generation())
        />
    }
}

#[component]
pub fn BidGenerationPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let config = app_state.0.config;
    let prefs = app_state.0.prefs;

    let store = OutlineStore::new(sample_outline(), config.generation_delay_ms);
    let actions = store.actions();

    let flags = Signal::derive(move || CatalogFlags {
        generate: true,
        word_count: prefs.get().show_word_counts,
        ..CatalogFlags::default()
    });

    let total_words = move || store.forest.with(|f| outline::total_word_count(f));
    let pending = move || store.book.with(|b| b.pending_count());
    let any_pending = move || pending() > 0;

    let toggle_word_counts = {
        let app_state = app_state.clone();
        move |_: leptos::ev::MouseEvent| app_state.0.set_show_word_counts(!prefs.get_untracked().show_word_counts)
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"全文生成"</CardTitle>
                <CardDescription>
                    {move || format!("目标字数合计 {} 字", total_words())}
                </CardDescription>
            </CardHeader>
            <CardContent>
                <div class="mb-3 flex flex-wrap items-center gap-2">
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| store.expand_all()>
                        "全部展开"
                    </Button>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| store.collapse_all()>
                        "全部折叠"
                    </Button>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=toggle_word_counts>
                        {move || if prefs.get().show_word_counts { "隐藏字数" } else { "显示字数" }}
                    </Button>
                    <Show when=any_pending fallback=|| ().into_view()>
                        <span class="text-xs text-muted-foreground">
                            {move || format!("{} 个章节生成中", pending())}
                        </span>
                    </Show>
                </div>

                {move || {
                    view! {
                        <CatalogTree
                            forest=store.forest
                            actions=actions
                            flags=flags.get()
                            indent=config.indent
                            selection=store.selection
                            book=store.book
                            active_id=store.active_id
                        />
                    }
                }}
            </CardContent>
        </Card>

        <RegenerateDialog store=store />
    }
}

#[component]
pub fn BidEditingPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let config = app_state.0.config;

    let store = OutlineStore::new(sample_outline(), config.generation_delay_ms);
    let actions = store.actions();
    let flags = CatalogFlags {
        structure: true,
        ..CatalogFlags::default()
    };

    let active_title = move || {
        store.active_id.get().and_then(|id| {
            store
                .forest
                .with(|f| find(f, &id).map(|n| n.title().to_string()))
        })
    };

    let content = move || {
        store
            .active_id
            .get()
            .and_then(|id| store.book.with(|b| b.content(&id).map(str::to_string)))
            .unwrap_or_default()
    };

    let char_count = move || {
        store
            .active_id
            .get()
            .map(|id| store.book.with(|b| b.char_count(&id)))
            .unwrap_or(0)
    };

    let on_content_input = move |ev: web_sys::Event| {
        let Some(id) = store.active_id.get_untracked() else {
            return;
        };
        store.set_content(&id, event_target_value(&ev));
    };

    view! {
        <div class="grid gap-4 md:grid-cols-[minmax(0,2fr)_minmax(0,3fr)]">
            <Card>
                <CardHeader>
                    <CardTitle>"章节目录"</CardTitle>
                    <CardDescription>"单击选择章节，双击重命名"</CardDescription>
                </CardHeader>
                <CardContent>
                    <CatalogTree
                        forest=store.forest
                        actions=actions
                        flags=flags
                        indent=config.indent
                        selection=store.selection
                        book=store.book
                        active_id=store.active_id
                    />
                </CardContent>
            </Card>

            <Card>
                <CardHeader>
                    <CardTitle>{move || active_title().unwrap_or_else(|| "未选择章节".to_string())}</CardTitle>
                    <CardDescription>{move || format!("{} 字", char_count())}</CardDescription>
                </CardHeader>
                <CardContent>
                    <Show
                        when=move || store.active_id.get().is_some()
                        fallback=|| view! {
                            <div class="text-xs text-muted-foreground">"请先在左侧选择一个章节。"</div>
                        }
                    >
                        <div class="flex flex-col gap-2">
                            <Label html_for="section-content">"章节内容"</Label>
                            <textarea
                                id="section-content"
                                class="min-h-[320px] w-full rounded-md border border-input bg-transparent px-3 py-2 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                                prop:value=content
                                on:input=on_content_input
                            />
                        </div>
                    </Show>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn OutlineEditorPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let config = app_state.0.config;

    let store = OutlineStore::new(sample_outline(), config.generation_delay_ms);
    let actions = store.actions();

    let batch_mode = RwSignal::new(false);
    let batch_confirm_open = RwSignal::new(false);
    let export_preview: RwSignal<Option<String>> = RwSignal::new(None);
    let export_error: RwSignal<Option<String>> = RwSignal::new(None);

    let flags = move || CatalogFlags {
        batch: batch_mode.get(),
        edit_button: true,
        structure: !batch_mode.get(),
        ..CatalogFlags::default()
    };

    let selected_count = move || store.live_selection().len();
    let visible_count = move || store.forest.with(|f| visible_rows(f).len());

    let exit_batch = move || {
        store.deselect_all();
        batch_mode.set(false);
    };

    let batch_description = Signal::derive(move || {
        format!("将删除选中的 {} 个章节及其所有子章节。", selected_count())
    });

    let on_export_text = move |_: leptos::ev::MouseEvent| {
        export_error.set(None);
        export_preview.set(Some(store.forest.with(|f| to_outline_text(f))));
    };

    let on_export_json = move |_: leptos::ev::MouseEvent| match store.forest.with(|f| to_json(f)) {
        Ok(json) => {
            export_error.set(None);
            export_preview.set(Some(json));
        }
        Err(e) => {
            export_preview.set(None);
            export_error.set(Some(e.to_string()));
        }
    };

    let on_add_chapter = move |_: leptos::ev::MouseEvent| {
        let last = store
            .forest
            .with_untracked(|f| f.last().map(|n| n.id().clone()));
        match last {
            Some(after) => store.insert_sibling(None, &after),
            None => leptos::logging::warn!("outline: no chapter to insert after"),
        }
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"目录编辑"</CardTitle>
                <CardDescription>
                    {move || format!("{} 个章节，当前显示 {} 个", store.forest.with(|f| outline::all_ids(f).len()), visible_count())}
                </CardDescription>
            </CardHeader>
            <CardContent>
                <div class="mb-3 flex flex-wrap items-center gap-2">
                    <Show
                        when=move || batch_mode.get()
                        fallback=move || view! {
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_add_chapter>
                                "新增章节"
                            </Button>
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| batch_mode.set(true)>
                                "批量操作"
                            </Button>
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_export_text>
                                "导出目录"
                            </Button>
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_export_json>
                                "导出 JSON"
                            </Button>
                        }
                    >
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| store.select_all()>
                            "全选"
                        </Button>
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| store.deselect_all()>
                            "取消全选"
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:disabled=move || selected_count() == 0
                            on:click=move |_| batch_confirm_open.set(true)
                        >
                            {move || format!("删除所选 ({})", selected_count())}
                        </Button>
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=move |_| exit_batch()>
                            "退出批量"
                        </Button>
                    </Show>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=move |_| store.expand_all()>
                        "全部展开"
                    </Button>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=move |_| store.collapse_all()>
                        "全部折叠"
                    </Button>
                </div>

                {move || {
                    view! {
                        <CatalogTree
                            forest=store.forest
                            actions=actions
                            flags=flags()
                            indent=config.indent
                            selection=store.selection
                            book=store.book
                            active_id=store.active_id
                        />
                    }
                }}

                <Show when=move || export_error.get().is_some() fallback=|| ().into_view()>
                    {move || export_error.get().map(|e| view! {
                        <Alert class="mt-4 border-destructive/30">
                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                        </Alert>
                    })}
                </Show>

                <Show when=move || export_preview.get().is_some() fallback=|| ().into_view()>
                    <pre class="mt-4 max-h-80 overflow-auto rounded-md border bg-muted px-3 py-2 text-xs">
                        {move || export_preview.get().unwrap_or_default()}
                    </pre>
                </Show>
            </CardContent>
        </Card>

        <ConfirmDialog
            open=batch_confirm_open
            title="批量删除"
            description=batch_description
            confirm_label="删除"
            destructive=true
            on_confirm=Callback::new(move |_| {
                store.batch_delete();
                batch_mode.set(false);
            })
        />
    }
}

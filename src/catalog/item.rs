use super::{indent_px, CatalogFlags, OutlineActions, TitleEdit};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Spinner};
use crate::config::IndentConfig;
use crate::generation::GenerationBook;
use crate::outline::{NodeId, OutlineNode, Selection, MAX_WORD_COUNT};
use icons::{ChevronDown, ChevronRight};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// One outline node plus its visible descendants.
#[component]
pub fn CatalogItem(
    node: OutlineNode,
    #[prop(optional)] parent_id: Option<NodeId>,
    actions: OutlineActions,
    flags: CatalogFlags,
    indent: IndentConfig,
    #[prop(into)] selection: Signal<Selection>,
    #[prop(into)] book: Signal<GenerationBook>,
    #[prop(into)] active_id: Signal<Option<NodeId>>,
) -> impl IntoView {
    let id_sv = StoredValue::new(node.id().clone());
    let title_sv = StoredValue::new(node.title().to_string());
    let parent_sv = StoredValue::new(parent_id);

    let edit: RwSignal<TitleEdit> = RwSignal::new(TitleEdit::Viewing);
    let edit_ref: NodeRef<html::Input> = NodeRef::new();

    // Focus the inline editor once it is mounted.
    Effect::new(move |_| {
        if !edit.with(TitleEdit::is_editing) {
            return;
        }
        let Some(el) = edit_ref.get() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                let _ = el.focus();
                el.select();
            })
            .as_ref()
            .unchecked_ref(),
            0,
        );
    });

    let begin_edit = move || edit.update(|e| e.begin(&title_sv.get_value()));

    let commit_edit = move || {
        let mut committed = None;
        edit.update(|e| committed = e.commit());
        if let Some(title) = committed {
            actions.rename.run((id_sv.get_value(), title));
        }
    };

    let is_active = move || active_id.with(|a| a.as_ref() == Some(&id_sv.get_value()));
    let is_pending = move || book.with(|b| b.is_pending(&id_sv.get_value()));
    let has_content = move || book.with(|b| b.char_count(&id_sv.get_value()) > 0);

    let level = node.level();
    let has_children = node.has_children();
    let expanded = node.is_expanded();
    let word_count = node.word_count();
    let pad = indent_px(level, &indent);

    let toggle_view = if has_children {
        view! {
            <button
                class="inline-flex h-5 w-5 items-center justify-center text-muted-foreground hover:text-foreground"
                aria-label={if expanded { "Collapse" } else { "Expand" }}
                on:click=move |ev| {
                    ev.stop_propagation();
                    actions.toggle.run(id_sv.get_value());
                }
            >
                {if expanded {
                    view! { <ChevronDown class="size-4".to_string() /> }.into_any()
                } else {
                    view! { <ChevronRight class="size-4".to_string() /> }.into_any()
                }}
            </button>
        }
        .into_any()
    } else {
        view! { <span class="inline-block h-5 w-5" /> }.into_any()
    };

    let checkbox_view = flags.batch.then(|| {
        view! {
            <input
                type="checkbox"
                class="size-4 accent-primary"
                prop:checked=move || selection.with(|s| s.is_selected(&id_sv.get_value()))
                on:change=move |ev| {
                    actions.select.run((id_sv.get_value(), event_target_checked(&ev)));
                }
            />
        }
    });

    let title_view = move || {
        if edit.with(TitleEdit::is_editing) {
            view! {
                <input
                    node_ref=edit_ref
                    class="h-7 w-full min-w-0 flex-1 rounded-md border border-input bg-transparent px-2 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                    prop:value=move || match edit.get() {
                        TitleEdit::Editing(buf) => buf,
                        TitleEdit::Viewing => String::new(),
                    }
                    on:input=move |ev| edit.update(|e| e.set_buffer(event_target_value(&ev)))
                    on:blur=move |_| commit_edit()
                    on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => {
                            ev.prevent_default();
                            commit_edit();
                        }
                        "Escape" => {
                            ev.prevent_default();
                            edit.update(TitleEdit::cancel);
                        }
                        _ => {}
                    }
                />
            }
            .into_any()
        } else {
            view! {
                <span
                    class=move || {
                        if level == 1 {
                            "flex-1 truncate text-sm font-medium cursor-default select-none"
                        } else {
                            "flex-1 truncate text-sm cursor-default select-none"
                        }
                    }
                    title="双击重命名"
                    on:click=move |_| actions.activate.run(id_sv.get_value())
                    on:dblclick=move |_| begin_edit()
                >
                    {title_sv.get_value()}
                </span>
            }
            .into_any()
        }
    };

    let edit_button_view = flags.edit_button.then(|| {
        view! {
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                class="h-7 px-2 text-xs"
                on:click=move |_| begin_edit()
            >
                "编辑"
            </Button>
        }
    });

    let word_count_view = flags.word_count.then(|| {
        view! {
            <label class="inline-flex items-center gap-1 text-xs text-muted-foreground">
                <input
                    type="number"
                    min="0"
                    max=MAX_WORD_COUNT.to_string()
                    step="100"
                    class="h-7 w-20 rounded-md border border-input bg-transparent px-2 text-xs"
                    prop:value=word_count.map(|c| c.to_string()).unwrap_or_default()
                    on:change=move |ev| {
                        let raw = event_target_value(&ev);
                        let parsed = raw
                            .trim()
                            .parse::<u64>()
                            .ok()
                            .map(|c| u32::try_from(c.min(u64::from(MAX_WORD_COUNT))).unwrap_or(MAX_WORD_COUNT));
                        actions.set_word_count.run((id_sv.get_value(), parsed));
                    }
                />
                "字"
            </label>
        }
    });

    let generate_view = flags.generate.then(|| {
        view! {
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                class="h-7 px-2 text-xs"
                attr:disabled=move || is_pending()
                on:click=move |_| actions.generate.run(id_sv.get_value())
            >
                <span class="inline-flex items-center gap-1">
                    <Show when=is_pending fallback=|| ().into_view()>
                        <Spinner class="size-3" />
                    </Show>
                    {move || {
                        if is_pending() {
                            "生成中"
                        } else if has_content() {
                            "重新生成"
                        } else {
                            "生成内容"
                        }
                    }}
                </span>
            </Button>
        }
    });

    let structure_view = flags.structure.then(|| {
        view! {
            <div class="flex items-center gap-1">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    class="h-7 px-2 text-xs"
                    on:click=move |_| {
                        actions.insert_sibling.run((parent_sv.get_value(), id_sv.get_value()))
                    }
                >
                    "+同级"
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    class="h-7 px-2 text-xs"
                    on:click=move |_| actions.insert_child.run(id_sv.get_value())
                >
                    "+子级"
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    class="h-7 px-2 text-xs text-destructive"
                    on:click=move |_| actions.delete.run(id_sv.get_value())
                >
                    "删除"
                </Button>
            </div>
        }
    });

    // Collapsed subtrees are not rendered at all.
    let children_view = if expanded {
        let own_id = node.id().clone();
        node.children()
            .iter()
            .cloned()
            .map(|child| {
                view! {
                    <CatalogItem
                        node=child
                        parent_id=own_id.clone()
                        actions=actions
                        flags=flags
                        indent=indent
                        selection=selection
                        book=book
                        active_id=active_id
                    />
                }
                .into_any()
            })
            .collect_view()
            .into_any()
    } else {
        ().into_view().into_any()
    };

    view! {
        <div>
            <div
                class=move || {
                    if is_active() {
                        "group flex items-center gap-2 rounded-md py-1 pr-2 bg-primary/10 ring-1 ring-primary/30"
                    } else {
                        "group flex items-center gap-2 rounded-md py-1 pr-2 hover:bg-accent/50"
                    }
                }
                style=format!("padding-left: {}px", pad)
                data-level=level.to_string()
            >
                {toggle_view}
                {checkbox_view}
                {title_view}
                {edit_button_view}
                {word_count_view}
                {generate_view}
                {structure_view}
            </div>
            {children_view}
        </div>
    }
}

/// Root list of an outline. Re-renders from scratch whenever the forest
/// signal is replaced.
#[component]
pub fn CatalogTree(
    #[prop(into)] forest: Signal<Vec<OutlineNode>>,
    actions: OutlineActions,
    flags: CatalogFlags,
    indent: IndentConfig,
    #[prop(into)] selection: Signal<Selection>,
    #[prop(into)] book: Signal<GenerationBook>,
    #[prop(into)] active_id: Signal<Option<NodeId>>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col" data-name="CatalogTree">
            <Show
                when=move || forest.with(|f| !f.is_empty())
                fallback=|| view! { <div class="px-2 py-4 text-xs text-muted-foreground">"目录为空"</div> }
            >
                {move || {
                    forest
                        .get()
                        .into_iter()
                        .map(|node| {
                            view! {
                                <CatalogItem
                                    node=node
                                    actions=actions
                                    flags=flags
                                    indent=indent
                                    selection=selection
                                    book=book
                                    active_id=active_id
                                />
                            }
                        })
                        .collect_view()
                }}
            </Show>
        </div>
    }
}

use crate::catalog::OutlineActions;
use crate::config::EnvConfig;
use crate::generation::{simulate_content, GenerateRequest, GenerationBook};
use crate::outline::{self, ClockIds, IdSource, NodeId, OutlineNode, Selection};
use crate::storage::{load_ui_prefs, save_ui_prefs, UiPrefs};
use crate::util::now_ms;
use leptos::logging::{log, warn};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub prefs: RwSignal<UiPrefs>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            config: EnvConfig::new(),
            prefs: RwSignal::new(load_ui_prefs()),
        }
    }

    pub fn set_show_word_counts(&self, show: bool) {
        self.prefs.update(|p| p.show_word_counts = show);
        save_ui_prefs(&self.prefs.get_untracked());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// Sample bid outline each screen starts from.
pub(crate) fn sample_outline() -> Vec<OutlineNode> {
    vec![
        OutlineNode::branch(
            "1",
            "商务标书",
            1,
            true,
            vec![
                OutlineNode::leaf("1-1", "投标函", 2).with_word_count(500),
                OutlineNode::leaf("1-2", "法定代表人身份证明", 2).with_word_count(300),
                OutlineNode::leaf("1-3", "授权委托书", 2).with_word_count(300),
                OutlineNode::branch(
                    "1-4",
                    "资格证明文件",
                    2,
                    false,
                    vec![
                        OutlineNode::leaf("1-4-1", "营业执照", 3).with_word_count(200),
                        OutlineNode::leaf("1-4-2", "资质证书", 3).with_word_count(200),
                    ],
                ),
            ],
        ),
        OutlineNode::branch(
            "2",
            "技术标书",
            1,
            true,
            vec![
                OutlineNode::branch(
                    "2-1",
                    "项目理解与需求分析",
                    2,
                    true,
                    vec![
                        OutlineNode::leaf("2-1-1", "项目背景", 3).with_word_count(800),
                        OutlineNode::leaf("2-1-2", "需求分析", 3).with_word_count(1200),
                    ],
                ),
                OutlineNode::leaf("2-2", "总体技术方案", 2).with_word_count(2000),
                OutlineNode::leaf("2-3", "实施计划与进度保障", 2).with_word_count(1500),
                OutlineNode::leaf("2-4", "售后服务方案", 2).with_word_count(1000),
            ],
        ),
    ]
}

/// Outline state owned by one screen.
///
/// All edits go through the pure functions in [`crate::outline`]; the forest
/// signal is replaced wholesale on every change.
#[derive(Clone, Copy)]
pub(crate) struct OutlineStore {
    pub forest: RwSignal<Vec<OutlineNode>>,
    pub selection: RwSignal<Selection>,
    pub book: RwSignal<GenerationBook>,
    pub active_id: RwSignal<Option<NodeId>>,

    /// Section waiting for the overwrite confirmation.
    pub confirm_regenerate: RwSignal<Option<NodeId>>,

    ids: StoredValue<ClockIds<fn() -> i64>>,
    generation_delay_ms: u32,
}

impl OutlineStore {
    pub fn new(initial: Vec<OutlineNode>, generation_delay_ms: u32) -> Self {
        Self {
            forest: RwSignal::new(initial),
            selection: RwSignal::new(Selection::default()),
            book: RwSignal::new(GenerationBook::default()),
            active_id: RwSignal::new(None),
            confirm_regenerate: RwSignal::new(None),
            ids: StoredValue::new(ClockIds::new(now_ms as fn() -> i64)),
            generation_delay_ms,
        }
    }

    fn next_id(&self) -> NodeId {
        let mut id = None;
        self.ids.update_value(|ids| id = Some(ids.next_id()));
        id.unwrap_or_else(|| NodeId::new(format!("{}", now_ms())))
    }

    pub fn toggle_expansion(&self, id: &NodeId) {
        self.forest
            .update(|f| *f = outline::toggle_expansion(f, id));
    }

    pub fn expand_all(&self) {
        self.forest.update(|f| *f = outline::expand_all(f));
    }

    pub fn collapse_all(&self) {
        self.forest.update(|f| *f = outline::collapse_all(f));
    }

    pub fn rename(&self, id: &NodeId, title: &str) {
        self.forest.update(|f| *f = outline::rename(f, id, title));
    }

    pub fn insert_sibling(&self, parent_id: Option<&NodeId>, after_id: &NodeId) {
        let new_id = self.next_id();
        log!("outline: insert sibling {new_id} after {after_id}");
        self.forest
            .update(|f| *f = outline::insert_sibling(f, parent_id, after_id, new_id));
    }

    pub fn insert_child(&self, parent_id: &NodeId) {
        let new_id = self.next_id();
        log!("outline: insert child {new_id} under {parent_id}");
        self.forest
            .update(|f| *f = outline::insert_child(f, parent_id, new_id));
    }

    pub fn set_word_count(&self, id: &NodeId, count: Option<u32>) {
        self.forest
            .update(|f| *f = outline::set_word_count(f, id, count));
    }

    pub fn delete(&self, id: &NodeId) {
        log!("outline: delete {id}");
        self.forest.update(|f| *f = outline::delete(f, id));
        self.after_structure_removed();
    }

    pub fn toggle_select(&self, id: &NodeId, selected: bool) {
        self.selection.update(|s| s.toggle_select(id, selected));
    }

    pub fn select_all(&self) {
        let forest = self.forest.get_untracked();
        self.selection.update(|s| s.select_all(&forest));
    }

    pub fn deselect_all(&self) {
        self.selection.update(Selection::deselect_all);
    }

    /// Selected ids that still exist.
    pub fn live_selection(&self) -> Vec<NodeId> {
        let forest = self.forest.get();
        self.selection.with(|s| s.live(&forest))
    }

    pub fn batch_delete(&self) {
        let selection = self.selection.get_untracked();
        let forest = self.forest.get_untracked();
        log!(
            "outline: batch delete {} node(s)",
            selection.live(&forest).len()
        );
        let (next, cleared) = outline::batch_delete(&forest, &selection);
        self.forest.set(next);
        self.selection.set(cleared);
        self.after_structure_removed();
    }

    fn after_structure_removed(&self) {
        let forest = self.forest.get_untracked();
        self.book.update(|b| b.prune(&forest));
        if let Some(active) = self.active_id.get_untracked() {
            if !outline::contains(&forest, &active) {
                self.active_id.set(None);
            }
        }
    }

    /// Generation entry point for a row's "generate" action.
    pub fn request_generation(&self, id: &NodeId) {
        match self.book.with_untracked(|b| b.request(id)) {
            GenerateRequest::Start => self.start_generation(id),
            GenerateRequest::NeedsConfirmation => self.confirm_regenerate.set(Some(id.clone())),
            GenerateRequest::AlreadyPending => {
                warn!("generation: {id} is already running, ignoring request");
            }
        }
    }

    /// Runs after the user accepted overwriting existing content.
    pub fn confirm_generation(&self) {
        if let Some(id) = self.confirm_regenerate.get_untracked() {
            self.confirm_regenerate.set(None);
            self.start_generation(&id);
        }
    }

    fn start_generation(&self, id: &NodeId) {
        let forest = self.forest.get_untracked();
        let Some(node) = outline::find(&forest, id) else {
            return;
        };
        let mut started = false;
        self.book.update(|b| started = b.mark_pending(id));
        if !started {
            return;
        }

        let title = node.title().to_string();
        let target = node.word_count();
        log!("generation: start {id} ({title})");

        let store = *self;
        let id = id.clone();
        let finish = move || store.finish_generation(&id, &title, target);

        // Outside the browser there is no timer; finish right away.
        let window = if cfg!(target_arch = "wasm32") {
            web_sys::window()
        } else {
            None
        };
        let Some(window) = window else {
            finish();
            return;
        };
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(finish)
                .as_ref()
                .unchecked_ref(),
            timeout_ms(self.generation_delay_ms),
        );
    }

    fn finish_generation(&self, id: &NodeId, title: &str, target: Option<u32>) {
        // The section may have been deleted while generating.
        if !self.forest.with_untracked(|f| outline::contains(f, id)) {
            let forest = self.forest.get_untracked();
            self.book.update(|b| b.prune(&forest));
            return;
        }
        let content = simulate_content(title, target);
        self.book.update(|b| b.complete(id, content));
        log!("generation: done {id}");
    }

    pub fn set_content(&self, id: &NodeId, content: String) {
        self.book.update(|b| b.set_content(id, content));
    }

    pub fn actions(&self) -> OutlineActions {
        let store = *self;
        OutlineActions {
            toggle: Callback::new(move |id: NodeId| store.toggle_expansion(&id)),
            rename: Callback::new(move |(id, title): (NodeId, String)| store.rename(&id, &title)),
            insert_sibling: Callback::new(move |(parent, after): (Option<NodeId>, NodeId)| {
                store.insert_sibling(parent.as_ref(), &after)
            }),
            insert_child: Callback::new(move |id: NodeId| store.insert_child(&id)),
            delete: Callback::new(move |id: NodeId| store.delete(&id)),
            select: Callback::new(move |(id, selected): (NodeId, bool)| {
                store.toggle_select(&id, selected)
            }),
            set_word_count: Callback::new(move |(id, count): (NodeId, Option<u32>)| {
                store.set_word_count(&id, count)
            }),
            generate: Callback::new(move |id: NodeId| store.request_generation(&id)),
            activate: Callback::new(move |id: NodeId| store.active_id.set(Some(id))),
        }
    }
}

fn timeout_ms(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

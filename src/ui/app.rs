use std::{collections::HashMap, time::Instant};

use tui::widgets::ListState;

use crate::{
    api::dtos::todo::{TodoListItemResponse, TodoResponse},
    client::{
        api::TodoEndpoints,
        store::{PendingCreate, PendingDelete, TodoStore},
    },
    errors::TodoError,
};

use super::{
    debounce::{Debounced, TOGGLE_QUIET_PERIOD},
    form::TodoForm,
    notification::{
        Notification, Notifier, DELETED_MESSAGE, SAVED_MESSAGE, SAVING_MESSAGE, UPDATED_MESSAGE,
    },
    pager::Pager,
};

pub struct StatefulList<T> {
    pub state: ListState,
    pub items: Vec<T>,
}

impl<T> StatefulList<T> {
    pub fn with_items(items: Vec<T>) -> StatefulList<T> {
        StatefulList {
            state: ListState::default(),
            items,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn unselect(&mut self) {
        self.state.select(None);
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Replaces the items, keeping the selection inside the new bounds
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        match self.state.selected() {
            Some(_) if self.items.is_empty() => self.unselect(),
            Some(i) if i >= self.items.len() => self.state.select(Some(self.items.len() - 1)),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    None,
    Editing,
}

#[derive(Debug)]
pub struct Route {
    pub id: RouteId,
    pub active_block: ActiveBlock,
}

#[derive(Clone, PartialEq, Debug)]
pub enum RouteId {
    Home,
    Detail(i64),
    Edit(i64),
    NewTodo,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ActiveBlock {
    Home,
    Detail,
    Edit,
    NewTodo,
}

pub const DEFAULT_ROUTE: Route = Route {
    id: RouteId::Home,
    active_block: ActiveBlock::Home,
};

/// Mutation already shown in the cache, sent on the next tick
#[derive(Debug)]
pub enum PendingMutation {
    Create(PendingCreate),
    Delete(PendingDelete),
}

/// Completion toggle waiting for its quiet period
#[derive(Debug)]
struct PendingToggle {
    server_value: bool,
    value: Debounced<bool>,
}

/// State of the terminal client. The list page reads from the store's cache,
/// the detail and edit pages from a single fetched todo.
pub struct App<E: TodoEndpoints> {
    pub store: TodoStore<E>,
    pub todos: StatefulList<TodoListItemResponse>,
    pub pager: Pager,
    pub total: usize,
    pub form: TodoForm,
    pub detail: Option<TodoResponse>,
    pub notifier: Notifier,
    pub input_mode: InputMode,
    pending: Vec<PendingMutation>,
    toggles: HashMap<i64, PendingToggle>,
    navigation_stack: Vec<Route>,
}

impl<E: TodoEndpoints> App<E> {
    pub fn new(api: E) -> App<E> {
        App {
            store: TodoStore::new(api),
            todos: StatefulList::with_items(vec![]),
            pager: Pager::default(),
            total: 0,
            form: TodoForm::new(),
            detail: None,
            notifier: Notifier::default(),
            input_mode: InputMode::None,
            pending: Vec::new(),
            toggles: HashMap::new(),
            navigation_stack: vec![DEFAULT_ROUTE],
        }
    }

    /// Sends queued mutations, flushes settled toggles and refetches stale data
    pub fn on_tick(&mut self, now: Instant) {
        self.notifier.on_tick(now);
        self.process_pending(now);
        self.flush_toggles(now);

        if self.get_current_route().id == RouteId::Home {
            self.load_list(now);
        }
    }

    /// Gets the current active route
    pub fn get_current_route(&self) -> &Route {
        self.navigation_stack.last().unwrap_or(&DEFAULT_ROUTE)
    }

    /// Push a route to the navigation stack
    /// so that it is rendered
    pub fn push_navigation_stack(&mut self, route_id: RouteId, active_block: ActiveBlock) {
        self.navigation_stack.push(Route {
            id: route_id,
            active_block,
        });
    }

    pub fn pop_navigation_stack(&mut self) -> Option<Route> {
        if self.navigation_stack.len() == 1 {
            None
        } else {
            self.navigation_stack.pop()
        }
    }

    pub fn reset_navigation_stack(&mut self) {
        self.navigation_stack.truncate(1);
    }

    pub fn handle_error(&mut self, e: &TodoError, now: Instant) {
        log::warn!("{}", e);
        self.notifier.show(Notification::error(e.message(), now));
    }

    /// Fetches the list when the cache has none or it was invalidated.
    /// A failed fetch is not repeated until the next invalidation or [`App::refresh`].
    pub fn load_list(&mut self, now: Instant) {
        if self.store.cache().needs_list_fetch() {
            if let Err(e) = self.store.fetch_all_todos() {
                self.handle_error(&e, now);
            }
        }
        self.sync_list();
    }

    pub fn refresh(&mut self, now: Instant) {
        if let Err(e) = self.store.refresh_list() {
            self.handle_error(&e, now);
        }
        self.sync_list();
    }

    /// Id of the selected todo, `None` for placeholders the server has not confirmed
    fn selected_stored_id(&mut self, now: Instant) -> Option<i64> {
        let id = self.todos.selected()?.id;

        if id < 0 {
            self.notifier.show(Notification::info(SAVING_MESSAGE, now));
            return None;
        }

        Some(id)
    }

    /// Rebuilds the visible page from the cache, overlaying unsent toggles
    pub fn sync_list(&mut self) {
        let items = self
            .store
            .cache()
            .list()
            .map(|list| list.to_vec())
            .unwrap_or_default();

        self.total = items.len();
        self.pager.clamp(self.total);

        let mut page = self.pager.slice(&items).to_vec();
        for item in page.iter_mut() {
            if let Some(toggle) = self.toggles.get(&item.id) {
                item.completed = *toggle.value.value();
            }
        }

        self.todos.set_items(page);
    }

    pub fn next_page(&mut self) {
        self.pager.next(self.total);
        self.todos.unselect();
        self.sync_list();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
        self.todos.unselect();
        self.sync_list();
    }

    pub fn goto_page(&mut self, page: usize) {
        self.pager.goto(page, self.total);
        self.todos.unselect();
        self.sync_list();
    }

    pub fn open_new_todo(&mut self) {
        self.form = TodoForm::new();
        self.input_mode = InputMode::Editing;
        self.push_navigation_stack(RouteId::NewTodo, ActiveBlock::NewTodo);
    }

    /// Shows the placeholder right away, the request goes out on the next tick
    pub fn submit_new_todo(&mut self) {
        if !self.form.can_submit() {
            return;
        }

        let pending = self.store.begin_create(self.form.to_create_request());
        self.pending.push(PendingMutation::Create(pending));

        self.form = TodoForm::new();
        self.input_mode = InputMode::None;
        self.pop_navigation_stack();
        self.sync_list();
    }

    pub fn delete_selected(&mut self, now: Instant) {
        let Some(id) = self.selected_stored_id(now) else {
            return;
        };

        let pending = self.store.begin_delete(id);
        self.pending.push(PendingMutation::Delete(pending));
        self.toggles.remove(&id);
        self.sync_list();
    }

    fn process_pending(&mut self, now: Instant) {
        if self.pending.is_empty() {
            return;
        }

        for mutation in std::mem::take(&mut self.pending) {
            match mutation {
                PendingMutation::Create(pending) => {
                    if let Err(e) = self.store.finish_create(pending) {
                        self.handle_error(&e, now);
                    }
                }
                PendingMutation::Delete(pending) => match self.store.finish_delete(pending) {
                    Ok(()) => self.notifier.show(Notification::success(DELETED_MESSAGE, now)),
                    Err(e) => self.handle_error(&e, now),
                },
            }
        }

        self.sync_list();
    }

    /// Flips the selected item on screen, the patch waits for the quiet period
    pub fn toggle_selected(&mut self, now: Instant) {
        let Some(id) = self.selected_stored_id(now) else {
            return;
        };
        let completed = self.todos.selected().map_or(false, |item| item.completed);

        self.toggles
            .entry(id)
            .or_insert_with(|| PendingToggle {
                server_value: completed,
                value: Debounced::new(completed, TOGGLE_QUIET_PERIOD),
            })
            .value
            .set(!completed, now);

        self.sync_list();
    }

    pub fn has_pending_toggle(&self, id: i64) -> bool {
        self.toggles.contains_key(&id)
    }

    fn flush_toggles(&mut self, now: Instant) {
        let settled: Vec<(i64, bool, bool)> = self
            .toggles
            .iter_mut()
            .filter_map(|(id, toggle)| {
                toggle
                    .value
                    .take_settled(now)
                    .map(|value| (*id, value, toggle.server_value))
            })
            .collect();

        for (id, value, server_value) in settled {
            self.toggles.remove(&id);

            if value == server_value {
                continue;
            }

            match self.store.set_completed(id, value) {
                Ok(_) => self.notifier.show(Notification::success(UPDATED_MESSAGE, now)),
                Err(e) => self.handle_error(&e, now),
            }
        }

        self.sync_list();
    }

    pub fn open_selected(&mut self, now: Instant) {
        let Some(id) = self.selected_stored_id(now) else {
            return;
        };

        self.push_navigation_stack(RouteId::Detail(id), ActiveBlock::Detail);
        self.load_detail(id, now);
    }

    pub fn load_detail(&mut self, id: i64, now: Instant) {
        match self.store.fetch_todo(id) {
            Ok(todo) => self.detail = Some(todo),
            Err(e) => {
                self.detail = None;
                self.handle_error(&e, now);
                self.pop_navigation_stack();
            }
        }
    }

    pub fn start_edit(&mut self) {
        let Some(todo) = &self.detail else {
            return;
        };

        self.form = TodoForm::from_todo(todo);
        self.input_mode = InputMode::Editing;
        self.push_navigation_stack(RouteId::Edit(todo.id), ActiveBlock::Edit);
    }

    /// Full update of the edited todo, back to the list when it succeeds
    pub fn submit_edit(&mut self, now: Instant) {
        let RouteId::Edit(id) = self.get_current_route().id else {
            return;
        };
        if !self.form.can_submit() {
            return;
        }

        match self.store.put_todo(id, &self.form.to_update_request()) {
            Ok(_) => {
                self.notifier.show(Notification::success(SAVED_MESSAGE, now));
                self.detail = None;
                self.input_mode = InputMode::None;
                self.reset_navigation_stack();
                self.load_list(now);
            }
            Err(e) => self.handle_error(&e, now),
        }
    }

    pub fn submit_form(&mut self, now: Instant) {
        match self.get_current_route().active_block {
            ActiveBlock::NewTodo => self.submit_new_todo(),
            ActiveBlock::Edit => self.submit_edit(now),
            _ => {}
        }
    }

    /// Leaves the current page, dropping any unsaved form input
    pub fn go_back(&mut self) {
        match self.get_current_route().active_block {
            ActiveBlock::NewTodo | ActiveBlock::Edit => {
                self.form = TodoForm::new();
                self.input_mode = InputMode::None;
            }
            ActiveBlock::Detail => self.detail = None,
            ActiveBlock::Home => {}
        }
        self.pop_navigation_stack();
    }
}

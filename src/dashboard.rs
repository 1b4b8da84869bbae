//! The one object an app holds on to.
//!
//! A [`Dashboard`] owns the task library, the scheduled entries of the current
//! date window, the auth session and the notices, and runs every operation
//! against a [`Backend`] (a real server or the in-memory one). \
//! All methods follow the same shape: talk to the backend first, then apply the
//! canonical result locally, so the local state never runs ahead of the server.
//! The one exception is task creation, that falls back to keeping a local copy
//! when the server cannot be reached.

use chrono::{Duration, Local, NaiveDate};

use crate::calendar::week_view::WeekView;
use crate::calendar::DisplayMode;
use crate::library::{Filter, LibraryStats, SortKey, SortOrder, TaskLibrary};
use crate::notify::{NoticeSender, NotificationCenter};
use crate::schedule::{DragPayload, EntryId, ScheduledTask};
use crate::session::Session;
use crate::storage::LocalStore;
use crate::task::{Task, TaskId};
use crate::traits::Backend;

/// How many days before the selected day a window load covers
pub const WINDOW_DAYS_BEFORE: i64 = 7;
/// How many days after the selected day a window load covers
pub const WINDOW_DAYS_AFTER: i64 = 14;

/// Identifies one window load, so that a load that was superseded while in
/// flight can be told apart from the current one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What a window load brought back. Produced by [`Dashboard::fetch_window`],
/// consumed by [`Dashboard::apply_load`]
pub struct WindowLoad {
    tasks: Result<Vec<Task>, Box<dyn std::error::Error>>,
    entries: Result<Vec<ScheduledTask>, Box<dyn std::error::Error>>,
}

pub struct Dashboard<B: Backend> {
    backend: B,
    session: Session,
    store: LocalStore,

    library: TaskLibrary,
    entries: Vec<ScheduledTask>,
    notices: NotificationCenter,

    selected_day: NaiveDate,
    display_mode: DisplayMode,
    filter: Filter,
    sort_key: SortKey,
    sort_order: SortOrder,

    loading: bool,
    load_generation: u64,
    drag: Option<DragPayload>,
}

impl<B: Backend> Dashboard<B> {
    /// A dashboard backed by the store at the default location.
    /// The session and the last library snapshot are restored from it
    pub fn new(backend: B) -> Self {
        Self::new_with_store(backend, LocalStore::open(&LocalStore::default_file()))
    }

    pub fn new_with_store(backend: B, store: LocalStore) -> Self {
        Self::new_with_feedback_channel(backend, store, None)
    }

    /// Same, with a channel that will receive every notice as it is emitted
    pub fn new_with_feedback_channel(backend: B, store: LocalStore, channel: Option<NoticeSender>) -> Self {
        let session = Session::restore(&store);
        let library = store.library_snapshot().clone();
        let notices = match channel {
            Some(sender) => NotificationCenter::new_with_feedback_channel(sender),
            None => NotificationCenter::new(),
        };

        Self {
            backend,
            session,
            store,
            library,
            entries: Vec::new(),
            notices,
            selected_day: Local::now().naive_local().date(),
            display_mode: DisplayMode::default(),
            filter: Filter::default(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            loading: false,
            load_generation: 0,
            drag: None,
        }
    }

    pub fn session(&self) -> &Session          { &self.session }
    pub fn library(&self) -> &TaskLibrary      { &self.library }
    pub fn entries(&self) -> &[ScheduledTask]  { &self.entries }
    pub fn notices(&self) -> &NotificationCenter { &self.notices }
    pub fn notices_mut(&mut self) -> &mut NotificationCenter { &mut self.notices }
    pub fn is_loading(&self) -> bool           { self.loading }
    pub fn selected_day(&self) -> NaiveDate    { self.selected_day }
    pub fn display_mode(&self) -> DisplayMode  { self.display_mode }
    pub fn filter(&self) -> Filter             { self.filter }
    pub fn sort(&self) -> (SortKey, SortOrder) { (self.sort_key, self.sort_order) }
    pub fn dragging(&self) -> Option<&DragPayload> { self.drag.as_ref() }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }
    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort_key = key;
        self.sort_order = order;
    }

    /// The date window a load covers: the selected day, the week before it and
    /// the two weeks after it
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.selected_day - Duration::days(WINDOW_DAYS_BEFORE),
         self.selected_day + Duration::days(WINDOW_DAYS_AFTER))
    }

    //
    // Window loading.
    //
    // Loads are not cancelled when the user moves on: every load gets a ticket,
    // and applying a result whose ticket is no longer the newest is a no-op.
    // `load_window` is the everyday path; the three steps are public so a
    // caller that drives its own event loop can interleave them.
    //

    /// Mark the start of a new window load. Any load still in flight is
    /// superseded from this point on
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.loading = true;
        LoadTicket { generation: self.load_generation }
    }

    /// Fetch the tasks and the entries of the current window, concurrently.
    /// Nothing is applied yet
    pub async fn fetch_window(&self) -> WindowLoad {
        let (start, end) = self.window();
        let (tasks, entries) = tokio::join!(
            self.backend.list_tasks(&self.session),
            self.backend.list_entries(&self.session, start, end),
        );
        WindowLoad { tasks, entries }
    }

    /// Apply what a load brought back, unless a newer load has started since.
    /// A failed half falls back to an empty list and leaves a notice
    pub fn apply_load(&mut self, ticket: LoadTicket, outcome: WindowLoad) {
        if ticket.generation != self.load_generation {
            log::debug!("Discarding a superseded window load ({:?})", ticket);
            return;
        }

        match outcome.tasks {
            Ok(tasks) => self.library.replace_all(tasks),
            Err(err) => {
                log::error!("Unable to load tasks: {}", err);
                self.library.replace_all(Vec::new());
                self.notices.error("Could not load your tasks");
            },
        }
        match outcome.entries {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                log::error!("Unable to load the schedule: {}", err);
                self.entries = Vec::new();
                self.notices.error("Could not load your schedule");
            },
        }

        self.loading = false;
        self.save_snapshot();
    }

    /// Reload the current window from the backend
    pub async fn load_window(&mut self) {
        let ticket = self.begin_load();
        let outcome = self.fetch_window().await;
        self.apply_load(ticket, outcome);
    }

    /// Change the selected day and reload the window around it
    pub async fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
        self.load_window().await;
    }

    //
    // Task library
    //

    /// Create `draft` on the server and insert the canonical record it answers
    /// with. When the server cannot be reached the draft is kept as-is, with its
    /// client-assigned id, so the work is not lost; it returns the id that ended
    /// up in the library
    pub async fn create_task(&mut self, draft: Task) -> TaskId {
        let created = self.backend.create_task(&self.session, &draft).await;
        match created {
            Ok(created) => {
                let id = created.id().clone();
                self.library.upsert(created);
                self.notices.success("Task created");
                self.save_snapshot();
                id
            },
            Err(err) => {
                log::warn!("Unable to create \"{}\" on the server, keeping it locally: {}", draft.title(), err);
                let id = draft.id().clone();
                self.library.upsert(draft);
                self.notices.error("Server unreachable, the task is only saved on this device");
                self.save_snapshot();
                id
            },
        }
    }

    /// Push an edited task and apply the canonical result.
    /// On failure the local copy stays as it was
    pub async fn update_task(&mut self, task: Task) {
        let updated = self.backend.update_task(&self.session, &task).await;
        match updated {
            Ok(canonical) => {
                self.library.upsert(canonical);
                self.notices.success("Task updated");
                self.save_snapshot();
            },
            Err(err) => {
                log::error!("Unable to update \"{}\": {}", task.title(), err);
                self.notices.error("Could not update this task");
            },
        }
    }

    pub async fn toggle_completed(&mut self, id: &TaskId) {
        let mut task = match self.library.get(id) {
            Some(task) => task.clone(),
            None => return,
        };
        task.set_completed(task.completed() == false);
        self.update_task(task).await;
    }

    /// Delete a task from the server and the library.
    /// Entries that were scheduled from it stay on the calendar
    pub async fn delete_task(&mut self, id: &TaskId) {
        let deleted = self.backend.delete_task(&self.session, id).await;
        match deleted {
            Ok(()) => {
                self.library.remove(id);
                self.notices.success("Task deleted");
                self.save_snapshot();
            },
            Err(err) => {
                log::error!("Unable to delete task {}: {}", id, err);
                self.notices.error("Could not delete this task");
            },
        }
    }

    /// Create a copy of a task (" (Copy)" suffix, not completed) through the
    /// normal creation path
    pub async fn duplicate_task(&mut self, id: &TaskId) -> Option<TaskId> {
        let copy = self.library.get(id)?.duplicate();
        Some(self.create_task(copy).await)
    }

    //
    // Drag and drop. A drag is a two-phase affair: `pick_up` captures an
    // immutable snapshot of the task, `drop_on` resolves it against the entries
    // as they are at drop time.
    //

    /// Start dragging a task of the library. Returns the payload the drag
    /// carries, or `None` for an unknown id
    pub fn pick_up(&mut self, id: &TaskId) -> Option<DragPayload> {
        let payload = DragPayload::from_task(self.library.get(id)?);
        self.drag = Some(payload.clone());
        Some(payload)
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drop the dragged task on `day` at `slot_hour`.
    ///
    /// "No room left" is an expected outcome: it leaves an info notice and
    /// changes nothing. A backend failure leaves an error notice and changes
    /// nothing either; the grid only ever gains the record the server answered
    /// with
    pub async fn drop_on(&mut self, day: NaiveDate, slot_hour: f64) {
        let payload = match self.drag.take() {
            Some(payload) => payload,
            None => {
                log::debug!("Ignoring a drop with no drag in progress");
                return;
            },
        };

        let span = match payload.resolve_drop(&self.entries, day, slot_hour) {
            Some(span) => span,
            None => {
                self.notices.info("No free slot left on this day");
                return;
            },
        };

        let entry = payload.place(day, span);
        let created = self.backend.create_entry(&self.session, &entry).await;
        match created {
            Ok(created) => {
                self.entries.push(created);
                self.notices.success("Task scheduled");
            },
            Err(err) => {
                log::error!("Unable to schedule \"{}\": {}", entry.title(), err);
                self.notices.error("Could not schedule this task");
            },
        }
    }

    /// Take an entry off the calendar. The task it came from stays in the library
    pub async fn remove_entry(&mut self, id: &EntryId) {
        let deleted = self.backend.delete_entry(&self.session, id).await;
        match deleted {
            Ok(()) => {
                self.entries.retain(|entry| entry.id() != id);
                self.notices.success("Removed from the calendar");
            },
            Err(err) => {
                log::error!("Unable to remove entry {}: {}", id, err);
                self.notices.error("Could not remove this from the calendar");
            },
        }
    }

    //
    // Views
    //

    /// The weekly grid around the selected day
    pub fn week_view(&self) -> WeekView {
        let today = Local::now().naive_local().date();
        WeekView::build(self.selected_day, today, &self.entries)
    }

    /// The library, filtered and sorted the way the user asked
    pub fn library_view(&self) -> Vec<&Task> {
        self.library.view(self.filter, self.sort_key, self.sort_order)
    }

    pub fn stats(&self) -> LibraryStats {
        self.library.stats()
    }

    //
    // Auth
    //

    /// Sign in. Auth failures are returned (a form will want the message) and
    /// touch neither the session nor the task state
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
        let signed_in = self.backend.login(email, password).await?;
        log::info!("Signed in as {}", signed_in.user.email());
        self.session = Session::authenticated(signed_in.token, signed_in.user);
        self.session.persist(&mut self.store);
        self.load_window().await;
        Ok(())
    }

    /// Create an account and sign in with it
    pub async fn register(&mut self, email: &str, name: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
        let signed_in = self.backend.register(email, name, password).await?;
        log::info!("Registered {}", signed_in.user.email());
        self.session = Session::authenticated(signed_in.token, signed_in.user);
        self.session.persist(&mut self.store);
        self.load_window().await;
        Ok(())
    }

    /// Sign out: forget the credentials, the loaded window and the snapshot
    pub fn logout(&mut self) {
        if let Some(user) = self.session.user() {
            log::info!("Signing out {}", user.email());
        }
        self.session = Session::Anonymous;
        self.session.persist(&mut self.store);
        self.library.replace_all(Vec::new());
        self.entries.clear();
        self.drag = None;
        self.save_snapshot();
    }

    fn save_snapshot(&mut self) {
        self.store.save_library_snapshot(&self.library);
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::glitches::ServerGlitches;
    use crate::memory::{MemoryServer, DEV_PASSWORD};
    use crate::notify::NoticeLevel;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn scratch_file() -> PathBuf {
        let name = format!("diligence-dashboard-test-{}.json", uuid::Uuid::new_v4().to_hyphenated());
        std::env::temp_dir().join(name)
    }

    fn dashboard() -> (Dashboard<MemoryServer>, PathBuf) {
        let path = scratch_file();
        let dashboard = Dashboard::new_with_store(MemoryServer::new(), LocalStore::new(&path));
        (dashboard, path)
    }

    fn glitched_dashboard(glitches: ServerGlitches) -> (Dashboard<MemoryServer>, Arc<Mutex<ServerGlitches>>, PathBuf) {
        let handle = Arc::new(Mutex::new(glitches));
        let mut server = MemoryServer::new();
        server.set_glitches(Some(Arc::clone(&handle)));
        let path = scratch_file();
        let dashboard = Dashboard::new_with_store(server, LocalStore::new(&path));
        (dashboard, handle, path)
    }

    #[tokio::test]
    async fn stale_loads_are_discarded() {
        let (mut dashboard, path) = dashboard();
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();

        let newer_data = Task::new("Arrived second, stays".to_string(), 30);
        let stale = dashboard.begin_load();
        let stale_outcome = WindowLoad { tasks: Ok(Vec::new()), entries: Ok(Vec::new()) };
        let current = dashboard.begin_load();
        let current_outcome = WindowLoad { tasks: Ok(vec![newer_data.clone()]), entries: Ok(Vec::new()) };

        dashboard.apply_load(current, current_outcome);
        assert_eq!(dashboard.library().len(), 1);
        assert!(dashboard.is_loading() == false);

        // The slow first load resolves last; it must not wipe the newer state
        dashboard.apply_load(stale, stale_outcome);
        assert_eq!(dashboard.library().len(), 1);
        assert_eq!(dashboard.library().get(newer_data.id()).unwrap().title(), "Arrived second, stays");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn a_failed_create_keeps_a_local_copy() {
        let glitches = ServerGlitches {
            create_task_behaviour: (0, 1),
            ..ServerGlitches::default()
        };
        let (mut dashboard, _handle, path) = glitched_dashboard(glitches);
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();

        let draft = Task::new("Written offline".to_string(), 30);
        let draft_id = draft.id().clone();
        let kept_id = dashboard.create_task(draft).await;

        assert_eq!(kept_id, draft_id, "without a server, the client id stays");
        assert!(dashboard.library().get(&kept_id).is_some());
        assert_eq!(dashboard.notices().latest().unwrap().level(), NoticeLevel::Error);

        // The next create reaches the server and gets a server id
        let second = Task::new("Back online".to_string(), 30);
        let second_draft_id = second.id().clone();
        let second_id = dashboard.create_task(second).await;
        assert_ne!(second_id, second_draft_id);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn entry_failures_leave_the_grid_alone() {
        let glitches = ServerGlitches {
            create_entry_behaviour: (0, 1),
            ..ServerGlitches::default()
        };
        let (mut dashboard, _handle, path) = glitched_dashboard(glitches);
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();

        let id = dashboard.create_task(Task::new("Laundry".to_string(), 60)).await;
        assert!(dashboard.pick_up(&id).is_some());
        dashboard.drop_on(NaiveDate::from_ymd(2021, 10, 4), 9.0).await;

        assert_eq!(dashboard.entries().len(), 0);
        assert_eq!(dashboard.notices().latest().unwrap().level(), NoticeLevel::Error);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn full_days_reject_drops_politely() {
        let (mut dashboard, path) = dashboard();
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
        let day = NaiveDate::from_ymd(2021, 10, 4);

        let id = dashboard.create_task(Task::new("Wall to wall".to_string(), 960)).await;
        assert!(dashboard.pick_up(&id).is_some());
        dashboard.drop_on(day, 6.0).await;
        assert_eq!(dashboard.entries().len(), 1, "a 16-hour block fills the whole day");

        let other = dashboard.create_task(Task::new("Squeezed out".to_string(), 30)).await;
        assert!(dashboard.pick_up(&other).is_some());
        dashboard.drop_on(day, 9.0).await;

        assert_eq!(dashboard.entries().len(), 1);
        let latest = dashboard.notices().latest().unwrap();
        assert_eq!(latest.level(), NoticeLevel::Info);
        assert!(dashboard.dragging().is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn auth_failures_touch_nothing() {
        let (mut dashboard, path) = dashboard();
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
        dashboard.create_task(Task::new("Precious".to_string(), 30)).await;

        // A session is already open; a bad re-login must not destroy it
        assert!(dashboard.login("dev@example.com", "not the password").await.is_err());
        assert!(dashboard.session().is_authenticated());
        assert_eq!(dashboard.library().len(), 1);

        dashboard.logout();
        assert!(dashboard.session().is_authenticated() == false);
        assert!(dashboard.library().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn the_window_follows_the_selected_day() {
        let (mut dashboard, path) = dashboard();
        dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();

        let id = dashboard.create_task(Task::new("Far ahead".to_string(), 60)).await;
        let far_day = dashboard.selected_day() + Duration::days(60);
        assert!(dashboard.pick_up(&id).is_some());
        dashboard.drop_on(far_day, 9.0).await;
        assert_eq!(dashboard.entries().len(), 1, "the drop itself lands");

        // Reloading the current window drops it: it is 60 days out
        dashboard.load_window().await;
        assert_eq!(dashboard.entries().len(), 0);

        // Selecting a day near it brings it back
        dashboard.select_day(far_day).await;
        assert_eq!(dashboard.entries().len(), 1);
        let (start, end) = dashboard.window();
        assert_eq!(start, far_day - Duration::days(7));
        assert_eq!(end, far_day + Duration::days(14));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn snapshots_survive_a_restart() {
        let path = scratch_file();
        {
            let mut dashboard = Dashboard::new_with_store(MemoryServer::new(), LocalStore::new(&path));
            dashboard.login("dev@example.com", DEV_PASSWORD).await.unwrap();
            dashboard.create_task(Task::new("Remembered".to_string(), 30)).await;
        }

        // A fresh dashboard over a fresh (empty) server still shows the snapshot
        let dashboard = Dashboard::new_with_store(MemoryServer::new(), LocalStore::open(&path));
        assert!(dashboard.session().is_authenticated());
        assert_eq!(dashboard.library().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn a_drop_with_no_drag_is_ignored() {
        let (mut dashboard, _path) = dashboard();
        dashboard.drop_on(NaiveDate::from_ymd(2021, 10, 4), 9.0).await;
        assert!(dashboard.entries().is_empty());
        assert!(dashboard.notices().latest().is_none());
    }
}

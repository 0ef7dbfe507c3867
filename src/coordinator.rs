//! The single-flight update coordinator.
//!
//! Filter and selection mutations are serialized through a one-permit gate:
//! a request accepted while the gate is free mutates the state synchronously,
//! hands the aggregate recomputation to a blocking worker, and publishes the
//! finished aggregates exactly once before the gate is released. Requests
//! arriving while an update is in flight are dropped; the UI is expected to
//! disable its inputs during processing, but the gate enforces it regardless.

use crate::filter::CategoryFilter;
use crate::model::{Category, IconMap};
use crate::partition::PartitionSet;
use crate::selection::Selection;
use crate::views::{CacheStats, ChartSeries, TableRow, ViewCache};
use crate::{Ledger, Result};
use anyhow::{anyhow, Context};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, warn};

/// A filter or selection mutation coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Toggle one category on or off.
    Toggle(Category),
    /// Toggle a category given by its CSV name.
    ToggleName(String),
    /// Toggle a category given by its icon name.
    ToggleIcon(String),
    /// Activate every category.
    ShowAll,
    /// Deactivate every category. Also resets the month/day drill-down.
    HideAll,
    /// Apply a chart or table label (a year, a day, or a month name) to the
    /// selection.
    Select(String),
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The request was accepted and the aggregates were republished.
    Updated,
    /// An update was already in flight (or the service is shutting down);
    /// the request was not applied.
    Dropped,
    /// The request referenced an unknown category/icon or an invalid label.
    /// Logged and treated as a no-op.
    Ignored,
}

/// The fully recomputed aggregates for one drill-down position, published
/// after every accepted request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregateView {
    pub selection: Selection,
    /// Per-month sums for the selected year.
    pub year_series: ChartSeries,
    /// Spend-to-date per day for the selected month; empty when no month is
    /// selected.
    pub month_series: ChartSeries,
    /// Table rows for the selected month or day; absent when no month is
    /// selected.
    pub table_rows: Option<Vec<TableRow>>,
}

/// The internal form of a request after name resolution.
enum Action {
    Toggle(Category),
    ShowAll,
    HideAll,
    Select(String),
}

/// Owns the immutable partitions, the aggregation cache, the filter and the
/// selection, and coordinates their updates.
///
/// Constructed explicitly and passed to whoever consumes it; there is no
/// ambient singleton. The background worker only ever reads the filter and
/// selection snapshots taken at hand-off time and writes nothing but the
/// cache, which is guarded by its own mutex against concurrent foreground
/// reads.
pub struct DataService {
    icons: IconMap,
    filter: Mutex<CategoryFilter>,
    selection: Mutex<Selection>,
    cache: Arc<Mutex<ViewCache>>,
    gate: Arc<Semaphore>,
    stop: Arc<AtomicBool>,
    publisher: watch::Sender<Option<AggregateView>>,
    first_date: NaiveDate,
    last_date: NaiveDate,
    row_count: usize,
}

impl DataService {
    /// Builds the service from a loaded ledger: validates the icon mapping,
    /// partitions the ledger, and selects the latest year.
    pub fn new(ledger: Ledger) -> Result<Self> {
        let icons = IconMap::new().context("the icon/category mapping is invalid")?;
        let partitions = PartitionSet::build(&ledger);
        let selection = Selection::new(ledger.last_date().year());
        let (publisher, _) = watch::channel(None);
        Ok(Self {
            icons,
            filter: Mutex::new(CategoryFilter::new()),
            selection: Mutex::new(selection),
            cache: Arc::new(Mutex::new(ViewCache::new(partitions))),
            gate: Arc::new(Semaphore::new(1)),
            stop: Arc::new(AtomicBool::new(false)),
            publisher,
            first_date: ledger.first_date(),
            last_date: ledger.last_date(),
            row_count: ledger.len(),
        })
    }

    /// True while an accepted request is being processed. Presentation can
    /// use this to gate its inputs.
    pub fn is_processing(&self) -> bool {
        self.gate.available_permits() == 0
    }

    /// A receiver over the published aggregates. Holds `None` until the first
    /// accepted request completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<AggregateView>> {
        self.publisher.subscribe()
    }

    /// The most recently published aggregates, if any.
    pub fn latest(&self) -> Option<AggregateView> {
        self.publisher.borrow().clone()
    }

    /// Applies one request end to end: mutate state, recompute off the
    /// interactive context, publish, release the gate.
    pub async fn apply(&self, request: Request) -> Result<Outcome> {
        if self.stop.load(Ordering::Relaxed) {
            debug!("request dropped, the service is shutting down");
            return Ok(Outcome::Dropped);
        }

        // Resolve names up front so an unknown one never consumes the gate.
        let Some(action) = self.resolve(request) else {
            return Ok(Outcome::Ignored);
        };

        let Ok(permit) = self.gate.clone().try_acquire_owned() else {
            debug!("request dropped, an update is already in flight");
            return Ok(Outcome::Dropped);
        };

        // Mutate synchronously so the snapshot handed to the worker is
        // already correct.
        match &action {
            Action::Toggle(category) => {
                let mut filter = lock(&self.filter);
                if !filter.remove(*category) {
                    filter.add(*category);
                }
            }
            Action::ShowAll => lock(&self.filter).fill_all(),
            Action::HideAll => {
                lock(&self.filter).clear();
                lock(&self.selection).reset_drill_down();
            }
            Action::Select(label) => {
                if let Err(e) = lock(&self.selection).apply_label(label) {
                    warn!("selection not updated: {e}");
                    return Ok(Outcome::Ignored);
                }
            }
        }

        let filter = lock(&self.filter).clone();
        let selection = *lock(&self.selection);
        let cache = Arc::clone(&self.cache);
        let stop = Arc::clone(&self.stop);

        let worker =
            tokio::task::spawn_blocking(move || compute_aggregates(&cache, &filter, selection, &stop));
        let view = match worker.await {
            Ok(Some(view)) => view,
            Ok(None) => {
                debug!("aggregate recomputation abandoned during shutdown");
                return Ok(Outcome::Dropped);
            }
            Err(e) => {
                // The permit still releases the gate on every path out of
                // this function; a worker failure must not lock the service
                // in the processing state forever.
                error!("aggregate recomputation failed: {e}");
                return Err(anyhow!("aggregate recomputation failed: {e}"));
            }
        };

        // Publish the complete result, then release the gate.
        self.publisher.send_replace(Some(view));
        drop(permit);
        Ok(Outcome::Updated)
    }

    /// Signals an in-flight worker to stop at its next step boundary and
    /// waits for the gate, bounded by `wait`.
    pub async fn shutdown(&self, wait: Duration) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        match tokio::time::timeout(wait, self.gate.acquire()).await {
            Ok(_) => Ok(()),
            Err(_) => Err(anyhow!(
                "an aggregate update was still running after {wait:?}"
            )),
        }
    }

    /// Reads the chart series for the current filter. A foreground read; it
    /// fills the cache on a miss just like the background worker does.
    pub fn chart_series(&self, year: i32, month: u32) -> ChartSeries {
        let filter = lock(&self.filter).clone();
        lock(&self.cache).chart_series(&filter, year, month)
    }

    /// Reads the table rows for the current filter.
    pub fn table_rows(&self, year: i32, month: u32, day: u32) -> Vec<TableRow> {
        let filter = lock(&self.filter).clone();
        lock(&self.cache).table_rows(&filter, year, month, day)
    }

    pub fn selection(&self) -> Selection {
        *lock(&self.selection)
    }

    /// The current filter bitmask, as used in cache keys.
    pub fn bitmask(&self) -> String {
        lock(&self.filter).bitmask()
    }

    /// The active categories, in bitmask order.
    pub fn active_categories(&self) -> Vec<Category> {
        lock(&self.filter).active()
    }

    pub fn icons(&self) -> &IconMap {
        &self.icons
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    pub fn transaction_count(&self) -> usize {
        self.row_count
    }

    pub fn partition_count(&self) -> usize {
        lock(&self.cache).partition_count()
    }

    pub fn cache_stats(&self) -> CacheStats {
        lock(&self.cache).stats()
    }

    fn resolve(&self, request: Request) -> Option<Action> {
        match request {
            Request::Toggle(category) => Some(Action::Toggle(category)),
            Request::ToggleName(name) => match Category::from_name(&name) {
                Some(category) => Some(Action::Toggle(category)),
                None => {
                    warn!("[{name}] is not a known category, ignoring the request");
                    None
                }
            },
            Request::ToggleIcon(icon) => match self.icons.get(&icon) {
                Some(category) => Some(Action::Toggle(category)),
                None => {
                    warn!("[{icon}] is not a known category icon, ignoring the request");
                    None
                }
            },
            Request::ShowAll => Some(Action::ShowAll),
            Request::HideAll => Some(Action::HideAll),
            Request::Select(label) => Some(Action::Select(label)),
        }
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> Arc<Semaphore> {
        Arc::clone(&self.gate)
    }
}

/// Recovers from mutex poisoning instead of propagating the panic; the
/// protected structures stay consistent because cache entries are inserted
/// whole and filter/selection mutations are single assignments.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The blocking workload: fills the cache for the current selection and
/// assembles the view to publish. Runs with snapshots of the filter and
/// selection; it never touches the live state. Returns `None` when stopped
/// early by a shutdown signal.
fn compute_aggregates(
    cache: &Mutex<ViewCache>,
    filter: &CategoryFilter,
    selection: Selection,
    stop: &AtomicBool,
) -> Option<AggregateView> {
    let mut cache = lock(cache);
    let mut view = AggregateView {
        selection,
        ..AggregateView::default()
    };

    view.year_series = cache.chart_series(filter, selection.year(), 0);
    if stop.load(Ordering::Relaxed) {
        return None;
    }

    if selection.has_valid_month() {
        view.month_series = cache.chart_series(filter, selection.year(), selection.month());
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        let day = if selection.has_valid_day() {
            selection.day()
        } else {
            0
        };
        view.table_rows = Some(cache.table_rows(
            filter,
            selection.year(),
            selection.month(),
            day,
        ));
    }

    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{dec, sample_service};

    #[tokio::test]
    async fn test_apply_publishes_exactly_once() {
        let service = sample_service();
        let mut rx = service.subscribe();
        assert!(rx.borrow().is_none());
        assert!(!service.is_processing());

        let outcome = service
            .apply(Request::ToggleName("Health".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert!(!service.is_processing());

        assert!(rx.has_changed().unwrap());
        let view = rx.borrow_and_update().clone().unwrap();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(view.year_series.values()[0], dec("-15.00"));
        assert_eq!(view.year_series.values()[1], dec("0"));
    }

    #[tokio::test]
    async fn test_toggle_second_category_changes_aggregates() {
        let service = sample_service();
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        assert_eq!(service.bitmask(), "01000000000");

        service
            .apply(Request::Toggle(Category::Household))
            .await
            .unwrap();
        assert_eq!(service.bitmask(), "01100000000");

        let view = service.latest().unwrap();
        // February now carries the Household expense.
        assert_eq!(view.year_series.values()[1], dec("-20.00"));
    }

    #[tokio::test]
    async fn test_toggle_is_symmetric() {
        let service = sample_service();
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        assert_eq!(service.bitmask(), "00000000000");
        let view = service.latest().unwrap();
        assert!(view.year_series.is_empty());
    }

    #[tokio::test]
    async fn test_request_dropped_while_processing() {
        let service = sample_service();
        let mut rx = service.subscribe();

        // Occupy the gate as if an update were in flight.
        let permit = service.gate().try_acquire_owned().unwrap();
        assert!(service.is_processing());

        let outcome = service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Dropped);
        assert!(rx.borrow_and_update().is_none());
        // The dropped request must not have mutated the filter either.
        assert_eq!(service.bitmask(), "00000000000");

        drop(permit);
        assert!(!service.is_processing());
        let outcome = service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_unknown_names_are_ignored() {
        let service = sample_service();
        let mut rx = service.subscribe();

        let outcome = service
            .apply(Request::ToggleName("Income & credits".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);

        let outcome = service
            .apply(Request::ToggleIcon("PiggyBank".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);

        let outcome = service
            .apply(Request::Select("Smarch".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);

        // Nothing published, gate free again.
        assert!(rx.borrow_and_update().is_none());
        assert!(!service.is_processing());
    }

    #[tokio::test]
    async fn test_icon_toggle_resolves_to_category() {
        let service = sample_service();
        service
            .apply(Request::ToggleIcon("MedicalBox".to_string()))
            .await
            .unwrap();
        assert_eq!(service.active_categories(), vec![Category::Health]);
    }

    #[tokio::test]
    async fn test_selection_drill_down_fills_table() {
        let service = sample_service();
        service.apply(Request::ShowAll).await.unwrap();
        service
            .apply(Request::Select("2016".to_string()))
            .await
            .unwrap();
        service
            .apply(Request::Select("January".to_string()))
            .await
            .unwrap();

        let view = service.latest().unwrap();
        assert_eq!(view.selection.month(), 1);
        assert_eq!(view.month_series.values()[0], dec("-10.00"));
        let rows = view.table_rows.unwrap();
        assert_eq!(rows.len(), 2);

        service
            .apply(Request::Select("15".to_string()))
            .await
            .unwrap();
        let view = service.latest().unwrap();
        let rows = view.table_rows.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recipient, "B");
    }

    #[tokio::test]
    async fn test_no_month_selected_means_no_table() {
        let service = sample_service();
        service.apply(Request::ShowAll).await.unwrap();
        let view = service.latest().unwrap();
        assert!(view.month_series.is_empty());
        assert!(view.table_rows.is_none());
    }

    #[tokio::test]
    async fn test_hide_all_resets_drill_down() {
        let service = sample_service();
        service.apply(Request::ShowAll).await.unwrap();
        service
            .apply(Request::Select("January".to_string()))
            .await
            .unwrap();
        assert_eq!(service.selection().month(), 1);

        service.apply(Request::HideAll).await.unwrap();
        let selection = service.selection();
        assert_eq!(selection.month(), 0);
        assert_eq!(selection.day(), 0);
        assert_eq!(service.bitmask(), "00000000000");
    }

    #[tokio::test]
    async fn test_second_identical_request_hits_the_cache() {
        let service = sample_service();
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        let misses = service.cache_stats().misses;

        // Toggling off and back on lands on the original key again.
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        let stats = service.cache_stats();
        assert_eq!(stats.misses, misses + 1); // only the empty-filter key is new
        assert!(stats.hits >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_with_idle_service() {
        let service = sample_service();
        service.shutdown(Duration::from_millis(100)).await.unwrap();
        // Further requests are dropped once stopped.
        let outcome = service
            .apply(Request::Toggle(Category::Health))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Dropped);
    }

    #[tokio::test]
    async fn test_shutdown_times_out_while_processing() {
        let service = sample_service();
        let _permit = service.gate().try_acquire_owned().unwrap();
        let result = service.shutdown(Duration::from_millis(20)).await;
        assert!(result.is_err());
    }
}

//! The authoritative in-memory medication list and its persisted copy.
//!
//! Every mutation rewrites the whole storage slot. A failed write never undoes
//! or rejects the mutation: it is logged, kept as
//! [`MedicationStore::last_flush_error`], and broadcast as
//! [`StoreEvent::FlushFailed`].

use log::{debug, error, info};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use super::clock::Clock;
use super::errors::{MedicationError, PersistenceError};
use super::models::Medication;
use crate::storage::MedicationRepository;

/// Change notifications for front ends observing the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The list was (re)loaded from storage
    Loaded { count: usize },
    Added { index: usize },
    Updated { index: usize },
    Removed { index: usize },
    /// A mutation is in memory but could not be written to storage
    FlushFailed { message: String },
}

pub struct MedicationStore {
    repository: MedicationRepository,
    clock: Arc<dyn Clock>,
    medications: Vec<Medication>,
    subscribers: Vec<Sender<StoreEvent>>,
    last_flush_error: Option<PersistenceError>,
}

impl MedicationStore {
    /// An empty store; call [`MedicationStore::load`] to read saved data
    pub fn new(repository: MedicationRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            medications: Vec::new(),
            subscribers: Vec::new(),
            last_flush_error: None,
        }
    }

    /// A store populated from the repository
    pub fn open(repository: MedicationRepository, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::new(repository, clock);
        store.load();
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Missing or malformed data yields an empty list; this never fails.
    pub fn load(&mut self) -> &[Medication] {
        self.medications = self.repository.load(self.clock.as_ref());
        let count = self.medications.len();
        self.broadcast(StoreEvent::Loaded { count });
        &self.medications
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn get(&self, index: usize) -> Option<&Medication> {
        self.medications.get(index)
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    /// Append a medication and flush. Duplicates are allowed.
    ///
    /// Returns the new medication's position.
    pub fn add(&mut self, medication: Medication) -> usize {
        info!(
            "Adding medication '{}' ({}) at {}",
            medication.name(),
            medication.dosage(),
            medication.time_of_day().format("%H:%M")
        );
        self.medications.push(medication);
        let index = self.medications.len() - 1;

        self.flush();
        self.broadcast(StoreEvent::Added { index });
        index
    }

    /// Overwrite the four fields of the medication at `index` and flush
    pub fn update(&mut self, index: usize, replacement: Medication) -> Result<(), MedicationError> {
        let len = self.medications.len();
        let existing = self
            .medications
            .get_mut(index)
            .ok_or(MedicationError::IndexOutOfRange { index, len })?;

        info!(
            "Updating medication {} '{}' -> '{}' ({})",
            index,
            existing.name(),
            replacement.name(),
            replacement.dosage()
        );
        existing.replace_with(replacement);

        self.flush();
        self.broadcast(StoreEvent::Updated { index });
        Ok(())
    }

    /// Remove the medication at `index` and flush
    pub fn remove(&mut self, index: usize) -> Result<Medication, MedicationError> {
        let len = self.medications.len();
        if index >= len {
            return Err(MedicationError::IndexOutOfRange { index, len });
        }

        let removed = self.medications.remove(index);
        info!("Removed medication {} '{}'", index, removed.name());

        self.flush();
        self.broadcast(StoreEvent::Removed { index });
        Ok(removed)
    }

    /// Write the full list to storage
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.repository.save(&self.medications)
    }

    /// Error from the most recent flush, cleared by the next successful one
    pub fn last_flush_error(&self) -> Option<&PersistenceError> {
        self.last_flush_error.as_ref()
    }

    /// Receive every subsequent [`StoreEvent`]
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    fn flush(&mut self) {
        match self.persist() {
            Ok(()) => {
                debug!("Flushed {} medications", self.medications.len());
                self.last_flush_error = None;
            }
            Err(e) => {
                error!("Failed to save medications, keeping changes in memory: {}", e);
                let message = e.to_string();
                self.last_flush_error = Some(e);
                self.broadcast(StoreEvent::FlushFailed { message });
            }
        }
    }

    fn broadcast(&mut self, event: StoreEvent) {
        // Receivers that were dropped are pruned
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RecurrenceDays;
    use crate::storage::memory_storage::InMemoryBlobStorage;
    use crate::storage::test_utils::{
        aspirin, at, daily, fixed_clock, unscheduled_vitamin_d, FailingStorage, TestEnvironment,
    };
    use shared::DayOfWeek;

    fn memory_store() -> (MedicationStore, Arc<InMemoryBlobStorage>) {
        let storage = Arc::new(InMemoryBlobStorage::new());
        let repository = MedicationRepository::with_default_key(storage.clone());
        (MedicationStore::open(repository, Arc::new(fixed_clock())), storage)
    }

    fn reopen(storage: Arc<InMemoryBlobStorage>) -> MedicationStore {
        MedicationStore::open(
            MedicationRepository::with_default_key(storage),
            Arc::new(fixed_clock()),
        )
    }

    fn three_medications() -> (MedicationStore, Arc<InMemoryBlobStorage>) {
        let (mut store, storage) = memory_store();
        store.add(aspirin());
        store.add(daily("Metformin", "500mg", at(7, 30)));
        store.add(daily("Atorvastatin", "20mg", at(22, 0)));
        (store, storage)
    }

    #[test]
    fn test_first_run_is_empty() {
        let (store, _storage) = memory_store();
        assert!(store.is_empty());
        assert!(store.last_flush_error().is_none());
    }

    #[test]
    fn test_add_then_load_round_trips() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        let repository = MedicationRepository::with_default_key(env.storage.clone());
        let mut store = MedicationStore::open(repository.clone(), Arc::new(fixed_clock()));

        let index = store.add(aspirin());
        assert_eq!(index, 0);

        let reloaded = MedicationStore::open(repository, Arc::new(fixed_clock()));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.medications()[0].strictly_equals(&aspirin()));
    }

    #[test]
    fn test_add_allows_duplicates() {
        let (mut store, storage) = memory_store();
        store.add(aspirin());
        store.add(aspirin());
        assert_eq!(store.len(), 2);
        assert_eq!(reopen(storage).len(), 2);
    }

    #[test]
    fn test_update_changes_only_the_target() {
        let (mut store, storage) = three_medications();
        let before: Vec<Medication> = store.medications().to_vec();

        let replacement =
            Medication::new("Metformin XR", "750mg", at(8, 15), vec![DayOfWeek::Sunday]).unwrap();
        store.update(1, replacement.clone()).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.medications()[0].strictly_equals(&before[0]));
        assert!(store.medications()[1].strictly_equals(&replacement));
        assert!(store.medications()[2].strictly_equals(&before[2]));

        // Persisted too
        let reloaded = reopen(storage);
        assert!(reloaded.medications()[1].strictly_equals(&replacement));
    }

    #[test]
    fn test_update_out_of_range() {
        let (mut store, _storage) = three_medications();
        let result = store.update(3, aspirin());
        assert!(matches!(
            result,
            Err(MedicationError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_remove_takes_exactly_one() {
        let (mut store, storage) = three_medications();

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.name(), "Metformin");
        assert_eq!(store.len(), 2);
        assert_eq!(store.medications()[0].name(), "Aspirin");
        assert_eq!(store.medications()[1].name(), "Atorvastatin");

        assert_eq!(reopen(storage).len(), 2);
    }

    #[test]
    fn test_remove_out_of_range_leaves_list_unchanged() {
        let (mut store, storage) = three_medications();

        let result = store.remove(7);
        assert!(matches!(
            result,
            Err(MedicationError::IndexOutOfRange { index: 7, len: 3 })
        ));
        assert_eq!(store.len(), 3);
        assert_eq!(reopen(storage).len(), 3);
    }

    #[test]
    fn test_flush_failure_keeps_changes_in_memory() {
        let repository = MedicationRepository::with_default_key(Arc::new(FailingStorage::new()));
        let mut store = MedicationStore::open(repository, Arc::new(fixed_clock()));
        let events = store.subscribe();

        let index = store.add(aspirin());
        assert_eq!(index, 0);
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.last_flush_error(),
            Some(PersistenceError::Write { .. })
        ));

        let received: Vec<StoreEvent> = events.try_iter().collect();
        assert!(matches!(received[0], StoreEvent::FlushFailed { .. }));
        assert_eq!(received[1], StoreEvent::Added { index: 0 });
    }

    #[test]
    fn test_successful_flush_clears_previous_error() {
        let (mut store, _storage) = memory_store();
        store.add(aspirin());
        assert!(store.last_flush_error().is_none());
        assert!(store.persist().is_ok());
    }

    #[test]
    fn test_events_are_broadcast() {
        let (mut store, _storage) = memory_store();
        let first = store.subscribe();
        let second = store.subscribe();

        store.add(aspirin());
        store
            .update(0, daily("Aspirin", "81mg", at(8, 0)))
            .unwrap();
        store.remove(0).unwrap();
        store.load();

        let expected = vec![
            StoreEvent::Added { index: 0 },
            StoreEvent::Updated { index: 0 },
            StoreEvent::Removed { index: 0 },
            StoreEvent::Loaded { count: 0 },
        ];
        assert_eq!(first.try_iter().collect::<Vec<_>>(), expected);
        assert_eq!(second.try_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let (mut store, _storage) = memory_store();
        drop(store.subscribe());
        let kept = store.subscribe();

        store.add(aspirin());
        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), StoreEvent::Added { index: 0 });
    }

    #[test]
    fn test_loaded_record_without_days_is_tolerated() {
        let (mut store, storage) = memory_store();
        // Only storage can hold a medication with no days
        MedicationRepository::with_default_key(storage.clone())
            .save(&[unscheduled_vitamin_d()])
            .unwrap();

        store.load();
        assert_eq!(store.len(), 1);
        assert!(store.medications()[0].recurrence_days().is_empty());

        // Adding something else rewrites the slot without rejecting it
        store.add(Medication::new("Zinc", "10mg", at(9, 0), RecurrenceDays::all()).unwrap());
        assert_eq!(reopen(storage).len(), 2);
    }
}

use crate::config::StoreConfig;
use crate::core::query::{self, ProjectFilter, TestimonialFilter};
use crate::domain::model::{
    CacheEnvelope, Category, Collections, Project, ProjectsDocument, SearchResults, TeamDocument,
    TeamMember, Testimonial, TestimonialsDocument,
};
use crate::domain::ports::KeyValueStorage;
use crate::utils::error::{ContentError, Result};
use chrono::Utc;
use rand::seq::SliceRandom;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::broadcast;

/// Storage key for the timestamped cache envelope.
pub const CACHE_KEY: &str = "zas-data-cache";
/// Legacy flat keys, read only as a last-resort fallback.
pub const LEGACY_PROJECTS_KEY: &str = "zas-projects";
pub const LEGACY_TEAM_KEY: &str = "zas-team";
pub const LEGACY_TESTIMONIALS_KEY: &str = "zas-testimonials";

type LoadOutcome = std::result::Result<Collections, Arc<ContentError>>;

struct StoreState {
    collections: Collections,
    loaded: bool,
    in_flight: Option<broadcast::Sender<LoadOutcome>>,
}

type Callback = Box<dyn Fn(&Collections) + Send + Sync>;

#[derive(Default)]
struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Handle returned by [`ContentStore::subscribe`]; consuming it removes the
/// callback. Holds only a weak reference, so it never keeps a store alive.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<SubscriberList>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let mut list = subscribers.lock().unwrap();
            list.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Single source of truth for the site's three content collections.
///
/// Hides network fetch, TTL caching, legacy fallback, and in-flight
/// de-duplication behind a query API. Collections are owned by the store;
/// every query hands out fresh copies.
pub struct ContentStore<S> {
    storage: S,
    client: Client,
    config: StoreConfig,
    state: Arc<Mutex<StoreState>>,
    subscribers: Arc<Mutex<SubscriberList>>,
}

impl<S: Clone> Clone for ContentStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            client: self.client.clone(),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<S> ContentStore<S>
where
    S: KeyValueStorage + Clone + 'static,
{
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            client: Client::new(),
            config,
            state: Arc::new(Mutex::new(StoreState {
                collections: Collections::default(),
                loaded: false,
                in_flight: None,
            })),
            subscribers: Arc::new(Mutex::new(SubscriberList::default())),
        }
    }

    /// Load the three collections, serving from the cache envelope when it
    /// is still fresh (unless `force_refresh`).
    ///
    /// Concurrent callers attach to the load already in flight and receive
    /// its outcome; N simultaneous calls produce one set of network
    /// requests. The load itself runs on a spawned task, so it completes
    /// even if every waiting caller is dropped.
    pub async fn load(&self, force_refresh: bool) -> Result<Collections> {
        let mut rx = {
            let mut state = self.state.lock().unwrap();
            match &state.in_flight {
                Some(tx) => {
                    tracing::debug!("load already in flight, attaching");
                    tx.subscribe()
                }
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    state.in_flight = Some(tx);
                    let store = self.clone();
                    tokio::spawn(async move { store.drive_load(force_refresh).await });
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(Ok(collections)) => Ok(collections),
            Ok(Err(err)) => Err(ContentError::Load(err)),
            Err(_) => Err(ContentError::LoadInterrupted),
        }
    }

    async fn drive_load(self, force_refresh: bool) {
        let outcome: LoadOutcome = self.perform_load(force_refresh).await.map_err(Arc::new);
        if let Err(err) = &outcome {
            tracing::error!(error = %err, "content load failed");
        }

        // Taken before sending so waiters subscribed to this load all see
        // the outcome, while later callers start a fresh one.
        let tx = self.state.lock().unwrap().in_flight.take();
        if let Some(tx) = tx {
            let _ = tx.send(outcome.clone());
        }

        if let Ok(collections) = &outcome {
            self.notify(collections);
        }
    }

    async fn perform_load(&self, force_refresh: bool) -> Result<Collections> {
        if !force_refresh {
            if let Some(cached) = self.read_cache_envelope().await {
                tracing::debug!("serving collections from cache envelope");
                self.adopt(cached.clone());
                return Ok(cached);
            }
        }

        match self.fetch_all().await {
            Ok(collections) => {
                tracing::info!(
                    projects = collections.projects.len(),
                    team = collections.team.len(),
                    testimonials = collections.testimonials.len(),
                    "loaded collections from network"
                );
                self.adopt(collections.clone());
                self.write_cache_envelope(&collections).await;
                Ok(collections)
            }
            Err(err) => {
                tracing::warn!(error = %err, "network load failed, trying legacy fallback");
                match self.read_legacy_fallback().await {
                    Some(collections) => {
                        tracing::info!("recovered collections from legacy storage keys");
                        self.adopt(collections.clone());
                        Ok(collections)
                    }
                    None => Err(err),
                }
            }
        }
    }

    async fn fetch_all(&self) -> Result<Collections> {
        let endpoints = &self.config.endpoints;
        let (projects, team, testimonials) = tokio::try_join!(
            super::fetch::fetch_collection::<ProjectsDocument>(
                &self.client,
                &endpoints.projects,
                "projects",
                &self.config,
            ),
            super::fetch::fetch_collection::<TeamDocument>(
                &self.client,
                &endpoints.team,
                "team",
                &self.config,
            ),
            super::fetch::fetch_collection::<TestimonialsDocument>(
                &self.client,
                &endpoints.testimonials,
                "testimonials",
                &self.config,
            ),
        )?;

        Ok(Collections {
            projects: projects.projects,
            team: team.team,
            testimonials: testimonials.testimonials,
        })
    }

    fn adopt(&self, collections: Collections) {
        let mut state = self.state.lock().unwrap();
        state.collections = collections;
        state.loaded = true;
    }

    async fn read_cache_envelope(&self) -> Option<Collections> {
        let raw = match self.storage.get(CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::debug!(error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::debug!(error = %err, "malformed cache envelope, discarding");
                let _ = self.storage.remove(CACHE_KEY).await;
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(envelope.timestamp);
        if age.num_milliseconds() < self.config.cache_ttl.as_millis() as i64 {
            Some(envelope.data)
        } else {
            tracing::debug!("cache envelope expired, discarding");
            let _ = self.storage.remove(CACHE_KEY).await;
            None
        }
    }

    // Cache write failure must not fail a load that already has the data.
    async fn write_cache_envelope(&self, data: &Collections) {
        let envelope = CacheEnvelope {
            timestamp: Utc::now(),
            data: data.clone(),
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                if let Err(err) = self.storage.set(CACHE_KEY, &raw).await {
                    tracing::warn!(error = %err, "failed to persist cache envelope");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to encode cache envelope"),
        }
    }

    /// All three legacy keys must be present and parse; freshness is not
    /// verified on this path.
    async fn read_legacy_fallback(&self) -> Option<Collections> {
        let projects = self.storage.get(LEGACY_PROJECTS_KEY).await.ok()??;
        let team = self.storage.get(LEGACY_TEAM_KEY).await.ok()??;
        let testimonials = self.storage.get(LEGACY_TESTIMONIALS_KEY).await.ok()??;

        let projects: Vec<Project> = serde_json::from_str(&projects).ok()?;
        let team: Vec<TeamMember> = serde_json::from_str(&team).ok()?;
        let testimonials: Vec<Testimonial> = serde_json::from_str(&testimonials).ok()?;

        Some(Collections {
            projects,
            team,
            testimonials,
        })
    }

    /// Remove the cache envelope and the legacy fallback keys from storage.
    /// In-memory collections are left untouched.
    pub async fn clear_cache(&self) -> Result<()> {
        self.storage.remove(CACHE_KEY).await?;
        self.storage.remove(LEGACY_PROJECTS_KEY).await?;
        self.storage.remove(LEGACY_TEAM_KEY).await?;
        self.storage.remove(LEGACY_TESTIMONIALS_KEY).await?;
        Ok(())
    }

    /// Register a callback invoked after every successful load.
    ///
    /// Callbacks run on the load task and must not call back into the
    /// store's subscription methods.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Collections) + Send + Sync + 'static,
    {
        let mut list = self.subscribers.lock().unwrap();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Box::new(callback)));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    fn notify(&self, collections: &Collections) {
        let list = self.subscribers.lock().unwrap();
        for (_, callback) in &list.entries {
            callback(collections);
        }
    }

    // Query API. Never errors: an unloaded store yields empty results.

    pub fn projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        let state = self.state.lock().unwrap();
        query::filter_projects(&state.collections.projects, filter)
    }

    /// Up to `count` projects in uniformly shuffled order, without
    /// replacement. Unseeded; successive calls may differ.
    pub fn random_projects(&self, count: usize) -> Vec<Project> {
        let mut projects = {
            let state = self.state.lock().unwrap();
            state.collections.projects.clone()
        };
        projects.shuffle(&mut rand::thread_rng());
        projects.truncate(count);
        projects
    }

    pub fn project_by_id(&self, id: u32) -> Option<Project> {
        let state = self.state.lock().unwrap();
        state.collections.projects.iter().find(|p| p.id == id).cloned()
    }

    pub fn team(&self) -> Vec<TeamMember> {
        let state = self.state.lock().unwrap();
        query::sorted_team(&state.collections.team)
    }

    pub fn team_member_by_id(&self, id: u32) -> Option<TeamMember> {
        let state = self.state.lock().unwrap();
        state.collections.team.iter().find(|m| m.id == id).cloned()
    }

    pub fn testimonials(&self, filter: &TestimonialFilter) -> Vec<Testimonial> {
        let state = self.state.lock().unwrap();
        query::filter_testimonials(&state.collections.testimonials, filter)
    }

    pub fn testimonials_by_project(&self, project_name: &str) -> Vec<Testimonial> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .testimonials
            .iter()
            .filter(|t| t.project == project_name)
            .cloned()
            .collect()
    }

    pub fn search(&self, query_str: &str) -> SearchResults {
        let state = self.state.lock().unwrap();
        query::search_collections(
            &state.collections.projects,
            &state.collections.testimonials,
            query_str,
        )
    }

    pub fn clients(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        query::unique_clients(&state.collections.projects)
    }

    pub fn category_stats(&self) -> HashMap<Category, usize> {
        let state = self.state.lock().unwrap();
        query::category_stats(&state.collections.projects)
    }

    pub fn current_projects(&self) -> Vec<Project> {
        self.state.lock().unwrap().collections.projects.clone()
    }

    pub fn current_team(&self) -> Vec<TeamMember> {
        self.state.lock().unwrap().collections.team.clone()
    }

    pub fn current_testimonials(&self) -> Vec<Testimonial> {
        self.state.lock().unwrap().collections.testimonials.clone()
    }

    /// Whether a load (network, cache, or fallback) has ever succeeded.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().unwrap().loaded
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStorage;
    use crate::config::{Endpoints, StoreConfig};

    fn unloaded_store() -> ContentStore<MemoryStorage> {
        let config = StoreConfig::new(Endpoints::with_base("http://localhost:1"));
        ContentStore::new(MemoryStorage::new(), config)
    }

    #[test]
    fn queries_on_unloaded_store_are_empty() {
        let store = unloaded_store();

        assert!(store.projects(&ProjectFilter::default()).is_empty());
        assert!(store.team().is_empty());
        assert!(store.testimonials(&TestimonialFilter::default()).is_empty());
        assert!(store.testimonials_by_project("Acme Shop").is_empty());
        assert!(store.random_projects(3).is_empty());
        assert_eq!(store.project_by_id(1), None);
        assert_eq!(store.team_member_by_id(1), None);
        assert_eq!(store.search("acme").total, 0);
        assert!(store.clients().is_empty());
        assert!(store.category_stats().is_empty());
        assert!(!store.is_loaded());
        assert!(!store.is_loading());
    }

    #[test]
    fn unsubscribe_removes_the_callback() {
        let store = unloaded_store();

        let first = store.subscribe(|_| {});
        let _second = store.subscribe(|_| {});
        assert_eq!(store.subscribers.lock().unwrap().entries.len(), 2);

        first.unsubscribe();
        let list = store.subscribers.lock().unwrap();
        assert_eq!(list.entries.len(), 1);
        assert_eq!(list.entries[0].0, 1);
    }
}

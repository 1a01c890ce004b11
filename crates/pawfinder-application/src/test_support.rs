//! In-memory doubles for the application tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use pawfinder_core::dog::{Breed, Dog, DogApi, DogId, SearchPage};
use pawfinder_core::error::{PawError, Result};
use pawfinder_core::favorites::FavoritesRepository;
use pawfinder_core::search::SearchCriteria;
use pawfinder_core::session::{Credentials, SessionHandle, SessionOrigin};
use tokio::sync::oneshot;

type SearchFn = Box<dyn Fn(&SearchCriteria) -> Result<SearchPage> + Send + Sync>;

pub fn dog(id: &str, name: &str) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://img.example/{id}.jpg"),
        name: name.to_string(),
        age: 3,
        zip_code: "10001".to_string(),
        breed: "Beagle".to_string(),
    }
}

pub fn session() -> SessionHandle {
    SessionHandle::issue(SessionOrigin::Login)
}

/// Scriptable [`DogApi`]. Records every call by name.
pub struct MockDogApi {
    pub probe: Mutex<Result<()>>,
    pub login: Mutex<Result<()>>,
    pub logout: Mutex<Result<()>>,
    pub breeds: Mutex<Result<Vec<Breed>>>,
    pub dogs: Mutex<HashMap<DogId, Dog>>,
    pub dogs_error: Mutex<Option<PawError>>,
    pub match_result: Mutex<Result<DogId>>,
    search: Mutex<SearchFn>,
    search_gates: Mutex<VecDeque<Option<oneshot::Receiver<()>>>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockDogApi {
    fn default() -> Self {
        Self {
            probe: Mutex::new(Ok(())),
            login: Mutex::new(Ok(())),
            logout: Mutex::new(Ok(())),
            breeds: Mutex::new(Ok(vec!["Beagle".to_string(), "Pug".to_string()])),
            dogs: Mutex::new(HashMap::new()),
            dogs_error: Mutex::new(None),
            match_result: Mutex::new(Err(PawError::internal("no match scripted"))),
            search: Mutex::new(Box::new(|_| Ok(SearchPage::default()))),
            search_gates: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockDogApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dogs(self, dogs: impl IntoIterator<Item = Dog>) -> Self {
        {
            let mut map = self.dogs.lock().unwrap();
            for dog in dogs {
                map.insert(dog.id.clone(), dog);
            }
        }
        self
    }

    pub fn on_search(
        &self,
        f: impl Fn(&SearchCriteria) -> Result<SearchPage> + Send + Sync + 'static,
    ) {
        *self.search.lock().unwrap() = Box::new(f);
    }

    /// Makes the next search wait until the returned sender fires.
    pub fn hold_next_search(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().push_back(Some(rx));
        tx
    }

    /// Lets the next search answer immediately (queued after held ones).
    pub fn release_next_search(&self) {
        self.search_gates.lock().unwrap().push_back(None);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl DogApi for MockDogApi {
    async fn probe(&self) -> Result<SessionHandle> {
        self.record("probe");
        self.probe.lock().unwrap().clone()?;
        Ok(SessionHandle::issue(SessionOrigin::Probe))
    }

    async fn login(&self, _credentials: &Credentials) -> Result<SessionHandle> {
        self.record("login");
        self.login.lock().unwrap().clone()?;
        Ok(SessionHandle::issue(SessionOrigin::Login))
    }

    async fn logout(&self, _session: &SessionHandle) -> Result<()> {
        self.record("logout");
        self.logout.lock().unwrap().clone()
    }

    async fn breeds(&self, _session: &SessionHandle) -> Result<Vec<Breed>> {
        self.record("breeds");
        self.breeds.lock().unwrap().clone()
    }

    async fn search(
        &self,
        _session: &SessionHandle,
        criteria: &SearchCriteria,
    ) -> Result<SearchPage> {
        self.record("search");
        let gate = self.search_gates.lock().unwrap().pop_front().flatten();
        let result = (self.search.lock().unwrap())(criteria);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn dogs(&self, _session: &SessionHandle, ids: &[DogId]) -> Result<Vec<Dog>> {
        self.record("dogs");
        if let Some(err) = self.dogs_error.lock().unwrap().clone() {
            return Err(err);
        }
        let map = self.dogs.lock().unwrap();
        Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
    }

    async fn match_dog(&self, _session: &SessionHandle, _ids: &[DogId]) -> Result<DogId> {
        self.record("match");
        self.match_result.lock().unwrap().clone()
    }
}

/// [`FavoritesRepository`] backed by a string slot, like a browser storage entry.
#[derive(Default)]
pub struct MemoryFavoritesRepository {
    pub raw: Mutex<Option<String>>,
    pub fail_writes: Mutex<bool>,
}

impl MemoryFavoritesRepository {
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
            fail_writes: Mutex::new(false),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoritesRepository for MemoryFavoritesRepository {
    async fn load(&self) -> Result<Option<Vec<DogId>>> {
        match self.raw.lock().unwrap().as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    async fn save(&self, ids: &[DogId]) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PawError::io("disk full"));
        }
        *self.raw.lock().unwrap() = Some(serde_json::to_string(ids)?);
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PawError::io("disk full"));
        }
        *self.raw.lock().unwrap() = None;
        Ok(())
    }
}

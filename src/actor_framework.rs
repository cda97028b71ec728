use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::error::{EntityKind, SalesError, SalesResult};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by [`ResourceActor`].
///
/// Hooks and actions run inside the owning actor, one request at a time, so
/// whatever they check and change happens atomically for that record.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Debug;
    type Patch: Send + Debug;

    /// Domain-specific operation beyond plain CRUD.
    type Action: Send + Debug;
    type ActionResult: Send + Debug;

    /// Used to tag not-found and plumbing errors.
    const KIND: EntityKind;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the generated id and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> SalesResult<Self>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> SalesResult<()> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> SalesResult<()>;
    fn on_delete(&self) -> SalesResult<()> {
        Ok(())
    }

    // --- Action Handler ---

    fn handle_action(&mut self, action: Self::Action) -> SalesResult<Self::ActionResult>;
}

/// Failures of the actor plumbing itself, as opposed to business rejections.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("{0} actor is closed")]
    ActorClosed(EntityKind),
    #[error("{0} actor dropped the request")]
    ActorDropped(EntityKind),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<SalesResult<T>>;

/// Predicate evaluated inside the actor for filtered listings.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Option<Filter<T>>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(kind = %T::KIND))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self
                        .store
                        .values()
                        .filter(|item| filter.as_ref().map_or(true, |keep| keep(*item)))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
                ResourceRequest::Shutdown => {
                    info!("Actor shutting down");
                    break;
                }
            }
        }
        info!(stored = self.store.len(), "Actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> SalesResult<T> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        self.store.insert(id.clone(), item.clone());
        debug!(id = %id, "Record created");
        Ok(item)
    }

    // Updates and actions work on a copy so a rejected hook leaves the stored
    // record untouched.
    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> SalesResult<T> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| SalesError::not_found(T::KIND, &id))?;
        let mut draft = item.clone();
        draft.on_update(patch)?;
        *item = draft.clone();
        Ok(draft)
    }

    fn handle_delete(&mut self, id: T::Id) -> SalesResult<()> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| SalesError::not_found(T::KIND, &id))?;
        item.on_delete()?;
        self.store.remove(&id);
        Ok(())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> SalesResult<T::ActionResult> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| SalesError::not_found(T::KIND, &id))?;
        let mut draft = item.clone();
        match draft.handle_action(action) {
            Ok(result) => {
                *item = draft;
                Ok(result)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Action rejected");
                Err(e)
            }
        }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// Handle to a [`ResourceActor`]. Cheap to clone; every clone talks to the same actor.
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> SalesResult<R> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed(T::KIND))?;
        response
            .await
            .map_err(|_| FrameworkError::ActorDropped(T::KIND))?
    }

    pub async fn create(&self, params: T::CreateParams) -> SalesResult<T> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> SalesResult<Option<T>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Like [`get`](Self::get) but a missing record is a `NotFound` error.
    pub async fn fetch(&self, id: T::Id) -> SalesResult<T> {
        let missing = SalesError::not_found(T::KIND, &id);
        self.get(id).await?.ok_or(missing)
    }

    pub async fn list(&self) -> SalesResult<Vec<T>> {
        self.request(|respond_to| ResourceRequest::List {
            filter: None,
            respond_to,
        })
        .await
    }

    pub async fn find(&self, filter: impl Fn(&T) -> bool + Send + 'static) -> SalesResult<Vec<T>> {
        self.request(|respond_to| ResourceRequest::List {
            filter: Some(Box::new(filter)),
            respond_to,
        })
        .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> SalesResult<T> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> SalesResult<()> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> SalesResult<T::ActionResult> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn shutdown(&self) -> SalesResult<()> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed(T::KIND))?;
        Ok(())
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

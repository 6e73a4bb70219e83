//! Create/edit/cancel/submit state shared by every admin editor.

use uuid::Uuid;

use crate::store::{Entity, StoreError, Table};

/// Where a form sends its writes.
#[allow(async_fn_in_trait)]
pub trait FormBackend<E: Entity> {
    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError>;
    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError>;
}

impl<E: Entity> FormBackend<E> for Table<E> {
    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        Table::create(self, draft).await
    }

    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError> {
        Table::update(self, id, patch).await
    }
}

pub struct AdminForm<E: Entity> {
    initial: E::Draft,
    editing: Option<E>,
    is_creating: bool,
    pub draft: E::Draft,
    submitting: bool,
    error: Option<String>,
}

impl<E> AdminForm<E>
where
    E: Entity,
    E::Draft: Clone + for<'a> From<&'a E>,
    E::Patch: From<E::Draft>,
{
    pub fn new(initial: E::Draft) -> Self {
        Self {
            draft: initial.clone(),
            initial,
            editing: None,
            is_creating: false,
            submitting: false,
            error: None,
        }
    }

    pub fn editing(&self) -> Option<&E> {
        self.editing.as_ref()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start_edit(&mut self, item: E) {
        self.draft = E::Draft::from(&item);
        self.editing = Some(item);
        self.is_creating = false;
        self.error = None;
    }

    pub fn start_create(&mut self) {
        self.editing = None;
        self.draft = self.initial.clone();
        self.is_creating = true;
        self.error = None;
    }

    pub fn cancel(&mut self) {
        self.editing = None;
        self.is_creating = false;
        self.draft = self.initial.clone();
        self.error = None;
    }

    /// Updates the item being edited, otherwise creates one from the draft.
    /// On success `on_success` runs and the form resets; on failure the
    /// message is kept and the draft is left as it was.
    pub async fn submit<B, F>(&mut self, backend: &B, on_success: F) -> Result<E, StoreError>
    where
        B: FormBackend<E>,
        F: FnOnce(&E),
    {
        self.submitting = true;
        self.error = None;

        let result = match &self.editing {
            Some(item) => {
                let patch = E::Patch::from(self.draft.clone());
                backend.update(item.id(), &patch).await
            }
            None => backend.create(&self.draft).await,
        };
        self.submitting = false;

        match result {
            Ok(saved) => {
                on_success(&saved);
                self.cancel();
                Ok(saved)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

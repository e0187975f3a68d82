//! Binds a list controller to the lifecycle and notifications of one
//! screen.

use std::sync::Arc;

use serde::Serialize;

use crate::api::ApiTransport;
use crate::controller::ResourceListController;
use crate::controller::errors::{ControllerError, ControllerResult};
use crate::controller::state::{FetchOutcome, ListOptions};
use crate::domain::record::Entity;
use crate::domain::resource::Resource;
use crate::domain::types::EntityId;
use crate::services::notify::{Notification, NotificationSink};
use crate::session::SessionStore;

pub struct ResourceScreen<E, T: ?Sized, S: ?Sized, N: ?Sized> {
    label: String,
    controller: ResourceListController<E, T, S>,
    notifications: Arc<N>,
}

impl<E, T, S, N> ResourceScreen<E, T, S, N>
where
    E: Entity,
    T: ApiTransport + ?Sized,
    S: SessionStore + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(
        label: impl Into<String>,
        controller: ResourceListController<E, T, S>,
        notifications: Arc<N>,
    ) -> Self {
        Self {
            label: label.into(),
            controller,
            notifications,
        }
    }

    /// Screen for one of the known collections. The resource's default
    /// search fields apply unless `options` names its own.
    pub fn for_resource(
        resource: Resource,
        transport: Arc<T>,
        session: Arc<S>,
        mut options: ListOptions,
        notifications: Arc<N>,
    ) -> Self {
        if options.search_fields.is_empty() {
            options = options.search_fields(resource.search_fields().iter().copied());
        }
        let controller = ResourceListController::new(resource, transport, session, options);
        Self::new(resource.label(), controller, notifications)
    }

    pub fn controller(&self) -> &ResourceListController<E, T, S> {
        &self.controller
    }

    /// Initial fetch with the default page, page size and no filters.
    pub async fn mount(&self) -> FetchOutcome {
        self.controller.load().await
    }

    pub fn unmount(&self) {
        self.controller.abandon();
    }

    pub async fn submit_create<P>(&self, payload: &P) -> ControllerResult<Option<E>>
    where
        P: Serialize + ?Sized,
    {
        let result = self.controller.create(payload).await;
        self.report(&result, "created");
        result
    }

    pub async fn submit_update<P>(&self, id: &EntityId, payload: &P) -> ControllerResult<Option<E>>
    where
        P: Serialize + ?Sized,
    {
        let result = self.controller.update(id, payload).await;
        self.report(&result, "updated");
        result
    }

    pub async fn submit_delete(&self, id: &EntityId) -> ControllerResult<()> {
        let result = self.controller.remove(id).await;
        self.report(&result, "deleted");
        result
    }

    fn report<R>(&self, result: &ControllerResult<R>, action: &str) {
        let notification = match result {
            Ok(_) => Notification::success(&self.label, format!("{} {action}", self.label)),
            // The session store handles expiry; an unmounted screen shows nothing.
            Err(ControllerError::SessionExpired | ControllerError::Abandoned) => return,
            Err(err) => Notification::error(&self.label, err.to_string()),
        };
        self.notifications.notify(notification);
    }
}

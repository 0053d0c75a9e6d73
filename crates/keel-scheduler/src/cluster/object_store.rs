use crate::id::ObjectId;

/// A client for the local object store ("plasma") manager.
///
/// All methods are non-blocking. Object arrival and eviction are reported
/// back to the scheduler as separate events, not through this client.
pub trait ObjectStoreClient: Send + 'static {
    /// Whether the connection to the object store manager is established.
    fn is_connected(&self) -> bool;

    /// Request that the given objects be transferred to the local store.
    /// This is best-effort; the request is repeated on the fetch timer
    /// until the objects become available locally.
    fn fetch(&mut self, object_ids: &[ObjectId]);
}

/// A client for requesting the recomputation of a lost object by
/// re-executing the task that produced it.
pub trait ReconstructionClient: Send + 'static {
    /// Request reconstruction of an object. Idempotent; requesting
    /// reconstruction of an object that is already being reconstructed
    /// (or that arrives in the meantime) is harmless.
    fn reconstruct(&mut self, object_id: ObjectId);
}

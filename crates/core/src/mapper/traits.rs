use async_trait::async_trait;

use crate::entity::{Entity, Value};
use crate::query::QueryArgsBag;

use super::{DataMapperError, ModelState};

/// Selected properties of one stored entity, in the requested order.
pub type Projection = Vec<(&'static str, Value)>;

/// CRUD contract between domain entities and a backing store.
///
/// Store specific implementations own statement construction and execution.
/// Argument validation failures are returned as `Err`; everything the store
/// reports is folded into the returned [`ModelState`].
#[async_trait]
pub trait DataMapper: Send + Sync {
    type Entity: Entity + Send + Sync;

    /// Persists a new entity, skipping the properties in `excluded`.
    async fn create(&self, entity: &Self::Entity, excluded: &[&str]) -> ModelState<Self::Entity>;

    /// Reads every entity matching the bag's filters, ordered by its sort directives.
    async fn read(
        &self,
        query: &QueryArgsBag,
    ) -> Result<ModelState<Self::Entity>, DataMapperError>;

    /// Reads only the properties named in `return_cols` of every matching entity.
    ///
    /// An empty `return_cols` selects every property. Unknown names make the
    /// state invalid without touching the store.
    async fn read_columns(
        &self,
        query: &QueryArgsBag,
        return_cols: &[&str],
    ) -> Result<ModelState<Projection>, DataMapperError>;

    /// Assigns `values` to every entity matching the bag's filters.
    ///
    /// The state's data holds the number of affected rows.
    async fn update(
        &self,
        query: &QueryArgsBag,
        values: &[(&str, Value)],
    ) -> Result<ModelState<usize>, DataMapperError>;

    /// Deletes every entity matching the bag's filters.
    ///
    /// The state's data holds the number of affected rows.
    async fn delete(&self, query: &QueryArgsBag) -> Result<ModelState<usize>, DataMapperError>;
}

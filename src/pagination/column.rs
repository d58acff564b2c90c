//! Sort-column definitions.
//!
//! A column definition knows how to read one sort key from an entity and in
//! which order the query sorts by it. The encoder only uses the first part;
//! the ordering metadata is carried for the query layer that turns a decoded
//! token into seek predicates.

use crate::core::value::TokenValue;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Sort order of a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Reads one ordered sort column from an entity of type `E`.
pub trait ColumnDefinition<E>: Send + Sync {
    /// Column identity, as the query layer names it.
    fn name(&self) -> &str;

    fn sort_order(&self) -> SortOrder;

    /// Extract this column's value from `entity`.
    fn value_of(&self, entity: &E) -> TokenValue;

    fn is_ascending(&self) -> bool {
        self.sort_order() == SortOrder::Ascending
    }
}

impl<E, C: ColumnDefinition<E> + ?Sized> ColumnDefinition<E> for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sort_order(&self) -> SortOrder {
        (**self).sort_order()
    }

    fn value_of(&self, entity: &E) -> TokenValue {
        (**self).value_of(entity)
    }
}

impl<E, C: ColumnDefinition<E> + ?Sized> ColumnDefinition<E> for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sort_order(&self) -> SortOrder {
        (**self).sort_order()
    }

    fn value_of(&self, entity: &E) -> TokenValue {
        (**self).value_of(entity)
    }
}

type AccessorFn<E> = dyn Fn(&E) -> TokenValue + Send + Sync;

/// Closure-backed column definition.
///
/// ```
/// use keyset_token::pagination::column::{Column, ColumnDefinition};
///
/// struct Order { id: i64, placed_by: String }
///
/// let id = Column::ascending("id", |o: &Order| o.id.into());
/// let customer = Column::descending("placed_by", |o: &Order| o.placed_by.as_str().into());
///
/// let order = Order { id: 9, placed_by: "ada".into() };
/// assert_eq!(id.value_of(&order), 9i64.into());
/// assert!(!customer.is_ascending());
/// ```
pub struct Column<E> {
    name: Cow<'static, str>,
    order: SortOrder,
    accessor: Arc<AccessorFn<E>>,
}

impl<E> Column<E> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, order: SortOrder, accessor: F) -> Self
    where
        F: Fn(&E) -> TokenValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            order,
            accessor: Arc::new(accessor),
        }
    }

    pub fn ascending<F>(name: impl Into<Cow<'static, str>>, accessor: F) -> Self
    where
        F: Fn(&E) -> TokenValue + Send + Sync + 'static,
    {
        Self::new(name, SortOrder::Ascending, accessor)
    }

    pub fn descending<F>(name: impl Into<Cow<'static, str>>, accessor: F) -> Self
    where
        F: Fn(&E) -> TokenValue + Send + Sync + 'static,
    {
        Self::new(name, SortOrder::Descending, accessor)
    }
}

impl<E> Clone for Column<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            order: self.order,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<E> fmt::Debug for Column<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl<E> ColumnDefinition<E> for Column<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sort_order(&self) -> SortOrder {
        self.order
    }

    fn value_of(&self, entity: &E) -> TokenValue {
        (self.accessor)(entity)
    }
}

//! Page-oriented token encoding.
//!
//! [`TokenEncoder`] turns "first / last / next / previous page" into
//! continuation tokens for a fixed, ordered set of sort columns and the
//! direction results are displayed in.
//!
//! | request  | anchor (Forward) | anchor (Backward) | token direction |
//! |----------|------------------|-------------------|-----------------|
//! | first    | none, empty text | none, empty text  | n/a             |
//! | last     | none             | none              | reversed        |
//! | next     | last row         | first row         | configured      |
//! | previous | first row        | last row          | reversed        |
//!
//! Whenever the token direction is reversed the query scans from the other
//! end, so the fetched rows come back in reverse display order;
//! [`TokenEncoder::restore_display_order`] flips them back.

use crate::core::token::{ContinuationToken, ContinuationTokenOptions, PaginationDirection};
use crate::core::value::TokenValue;
use crate::error::{constants, Result, TokenError};
use crate::pagination::column::ColumnDefinition;
use crate::pagination::serializer::TokenSerializer;
use std::fmt;
use tracing::debug;

/// Which edge of the current page the anchor comes from.
#[derive(Debug, Clone, Copy)]
enum Edge {
    /// Edge furthest along the configured direction
    Far,
    /// Edge nearest the start of the configured direction
    Near,
}

pub struct TokenEncoder<E> {
    columns: Vec<Box<dyn ColumnDefinition<E>>>,
    direction: PaginationDirection,
    serializer: TokenSerializer,
}

impl<E> TokenEncoder<E> {
    /// Build an encoder over `columns` in sort order.
    ///
    /// # Errors
    /// Returns `TokenError::ConfigError` if `columns` is empty or a column has
    /// an empty name.
    pub fn new<I, C>(
        columns: I,
        direction: PaginationDirection,
        options: ContinuationTokenOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: ColumnDefinition<E> + 'static,
    {
        Self::with_serializer(columns, direction, TokenSerializer::new(options))
    }

    /// Build an encoder that uses an already configured serializer.
    pub fn with_serializer<I, C>(
        columns: I,
        direction: PaginationDirection,
        serializer: TokenSerializer,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: ColumnDefinition<E> + 'static,
    {
        let columns: Vec<Box<dyn ColumnDefinition<E>>> = columns
            .into_iter()
            .map(|c| Box::new(c) as Box<dyn ColumnDefinition<E>>)
            .collect();

        if columns.is_empty() {
            return Err(TokenError::ConfigError(constants::ERR_NO_COLUMNS.to_string()));
        }
        if columns.iter().any(|c| c.name().is_empty()) {
            return Err(TokenError::ConfigError(
                constants::ERR_EMPTY_COLUMN_NAME.to_string(),
            ));
        }

        Ok(Self {
            columns,
            direction,
            serializer,
        })
    }

    /// Direction results are displayed in.
    pub fn direction(&self) -> PaginationDirection {
        self.direction
    }

    /// Sort columns in order.
    pub fn columns(&self) -> &[Box<dyn ColumnDefinition<E>>] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn serializer(&self) -> &TokenSerializer {
        &self.serializer
    }

    /// Empty text: start from the beginning.
    pub fn encode_first_page(&self) -> String {
        String::new()
    }

    /// Unanchored token scanning opposite to the display direction.
    pub fn encode_last_page(&self) -> Result<String> {
        let token = ContinuationToken::unanchored(self.direction.reverse());
        debug!(direction = ?token.direction(), "Encoding last page token");
        self.serializer.serialize(&token)
    }

    /// Token for the page after `reference`, the current page in display order.
    ///
    /// # Errors
    /// Returns `TokenError::MissingReference` if `reference` is empty.
    pub fn encode_next_page(&self, reference: &[E]) -> Result<String> {
        self.encode_from(reference, Edge::Far, self.direction)
    }

    /// Token for the page before `reference`, the current page in display order.
    ///
    /// # Errors
    /// Returns `TokenError::MissingReference` if `reference` is empty.
    pub fn encode_previous_page(&self, reference: &[E]) -> Result<String> {
        self.encode_from(reference, Edge::Near, self.direction.reverse())
    }

    /// [`encode_next_page`](Self::encode_next_page) for a single anchor row.
    pub fn encode_next_page_from(&self, entity: &E) -> Result<String> {
        self.encode_next_page(std::slice::from_ref(entity))
    }

    /// [`encode_previous_page`](Self::encode_previous_page) for a single anchor row.
    pub fn encode_previous_page_from(&self, entity: &E) -> Result<String> {
        self.encode_previous_page(std::slice::from_ref(entity))
    }

    /// Decode token text for the query layer.
    ///
    /// Blank text yields `Ok(None)`. An anchored token must carry exactly one
    /// value per configured column.
    pub fn decode(&self, text: &str) -> Result<Option<ContinuationToken>> {
        let token = self.serializer.deserialize(text)?;

        if let Some(values) = token.as_ref().and_then(ContinuationToken::values) {
            if values.len() != self.columns.len() {
                debug!(
                    expected = self.columns.len(),
                    actual = values.len(),
                    "Rejected token with wrong column count"
                );
                return Err(TokenError::ColumnCountMismatch {
                    expected: self.columns.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(token)
    }

    /// Non-failing form of [`decode`](Self::decode); `None` when rejected.
    pub fn try_decode(&self, text: &str) -> Option<Option<ContinuationToken>> {
        self.decode(text).ok()
    }

    /// Whether rows fetched for `token` arrive in reverse display order.
    pub fn requires_reversal(&self, token: Option<&ContinuationToken>) -> bool {
        token.is_some_and(|t| t.direction() != self.direction)
    }

    /// Put rows fetched for `token` back into display order.
    pub fn restore_display_order<T>(&self, token: Option<&ContinuationToken>, rows: &mut [T]) {
        if self.requires_reversal(token) {
            rows.reverse();
        }
    }

    fn encode_from(
        &self,
        reference: &[E],
        edge: Edge,
        token_direction: PaginationDirection,
    ) -> Result<String> {
        let take_last = matches!(
            (self.direction, edge),
            (PaginationDirection::Forward, Edge::Far) | (PaginationDirection::Backward, Edge::Near)
        );

        let anchor = if take_last {
            reference.last()
        } else {
            reference.first()
        }
        .ok_or(TokenError::MissingReference)?;

        let values: Vec<TokenValue> = self.columns.iter().map(|c| c.value_of(anchor)).collect();
        debug!(
            direction = ?token_direction,
            edge = ?edge,
            columns = values.len(),
            "Encoding anchored page token"
        );

        self.serializer
            .serialize(&ContinuationToken::new(token_direction, values))
    }
}

impl<E> fmt::Debug for TokenEncoder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name()).collect();
        f.debug_struct("TokenEncoder")
            .field("columns", &names)
            .field("direction", &self.direction)
            .field("serializer", &self.serializer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::column::Column;

    #[derive(Debug, Clone)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    fn page() -> Vec<Item> {
        vec![
            Item { id: 1, name: "a" },
            Item { id: 2, name: "b" },
            Item { id: 3, name: "c" },
        ]
    }

    fn encoder(direction: PaginationDirection) -> TokenEncoder<Item> {
        let columns = vec![
            Column::ascending("name", |i: &Item| i.name.into()),
            Column::ascending("id", |i: &Item| i.id.into()),
        ];
        match TokenEncoder::new(columns, direction, ContinuationTokenOptions::DEFAULT) {
            Ok(encoder) => encoder,
            Err(e) => panic!("encoder construction failed: {e}"),
        }
    }

    fn values_of(item: &Item) -> Vec<TokenValue> {
        vec![TokenValue::String(item.name.into()), TokenValue::I64(item.id)]
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_backward_display_anchors() {
        let encoder = encoder(PaginationDirection::Backward);
        let rows = page();

        let next = encoder
            .decode(&encoder.encode_next_page(&rows).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(next.direction(), PaginationDirection::Backward);
        assert_eq!(next.values(), Some(values_of(&rows[0]).as_slice()));

        let previous = encoder
            .decode(&encoder.encode_previous_page(&rows).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(previous.direction(), PaginationDirection::Forward);
        assert_eq!(previous.values(), Some(values_of(&rows[2]).as_slice()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_single_entity_is_its_own_anchor() {
        let encoder = encoder(PaginationDirection::Forward);
        let item = Item { id: 8, name: "solo" };

        let next = encoder.encode_next_page_from(&item).unwrap();
        let previous = encoder.encode_previous_page_from(&item).unwrap();

        let next = encoder.decode(&next).unwrap().unwrap();
        let previous = encoder.decode(&previous).unwrap().unwrap();
        assert_eq!(next.values(), previous.values());
        assert_ne!(next.direction(), previous.direction());
    }

    #[test]
    fn test_column_count_mismatch_rejected() {
        let encoder = encoder(PaginationDirection::Forward);
        let foreign = encoder
            .serializer()
            .serialize(&ContinuationToken::new(
                PaginationDirection::Forward,
                vec![TokenValue::I64(1)],
            ));
        let Ok(foreign) = foreign else {
            panic!("serialize failed");
        };

        assert!(matches!(
            encoder.decode(&foreign),
            Err(TokenError::ColumnCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(encoder.try_decode(&foreign), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_restore_display_order() {
        let encoder = encoder(PaginationDirection::Forward);
        let rows = page();

        let previous = encoder
            .decode(&encoder.encode_previous_page(&rows).unwrap())
            .unwrap();
        let mut fetched = vec![3, 2, 1];
        encoder.restore_display_order(previous.as_ref(), &mut fetched);
        assert_eq!(fetched, vec![1, 2, 3]);

        let next = encoder
            .decode(&encoder.encode_next_page(&rows).unwrap())
            .unwrap();
        let mut fetched = vec![4, 5, 6];
        encoder.restore_display_order(next.as_ref(), &mut fetched);
        assert_eq!(fetched, vec![4, 5, 6]);

        assert!(!encoder.requires_reversal(None));
    }

    #[test]
    fn test_unnamed_column_rejected() {
        let columns = vec![Column::ascending("", |i: &Item| i.id.into())];
        let result = TokenEncoder::new(
            columns,
            PaginationDirection::Forward,
            ContinuationTokenOptions::DEFAULT,
        );
        assert!(matches!(result, Err(TokenError::ConfigError(_))));
    }
}

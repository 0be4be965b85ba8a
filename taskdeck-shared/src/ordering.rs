/// Position assignment and full-list reorder semantics
///
/// The client's drag-and-drop UI computes a final id sequence and submits
/// it whole; nothing here does incremental position math. A reorder is
/// accepted only when the sequence is an exact permutation of the owner's
/// current task set, and is then applied as a single transaction: position
/// becomes the index in the sequence, and concurrent readers never observe
/// a half-applied ordering.
///
/// Rejection rules:
///
/// - a duplicated id, an id matching no task, or an omitted owned id is a
///   validation failure and leaves every stored position unchanged;
/// - an id that belongs to another user's task is an authorization
///   failure — the whole request is rejected, not just that id.
///
/// Concurrent reorders of the same list are last-write-wins by design;
/// the transaction only guarantees that no torn ordering is observable.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::ordering::reorder_tasks;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid, order: Vec<Uuid>) -> Result<(), Box<dyn std::error::Error>> {
/// reorder_tasks(&pool, owner, &order).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

/// Error type for reorder operations
#[derive(Debug, thiserror::Error)]
pub enum OrderingError {
    /// The sequence lists the same task twice
    #[error("Reorder sequence contains task {0} more than once")]
    DuplicateId(Uuid),

    /// The sequence omits tasks from the current list
    #[error("Reorder sequence is missing {0} task(s) from the current list")]
    IncompleteOrder(usize),

    /// The sequence references an id that matches no task
    #[error("Reorder sequence references unknown task {0}")]
    UnknownId(Uuid),

    /// The sequence references tasks owned by another user
    #[error("Reorder sequence references {} task(s) owned by another user", .0.len())]
    ForeignIds(Vec<Uuid>),

    /// Database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl OrderingError {
    /// Whether this rejection is an authorization failure (vs validation)
    pub fn is_authorization(&self) -> bool {
        matches!(self, OrderingError::ForeignIds(_))
    }
}

/// Difference between a requested ordering and the owned id set
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OrderDiff {
    /// Ids in the request that are not in the owned set
    pub extra: Vec<Uuid>,

    /// Number of owned ids absent from the request
    pub missing: usize,
}

impl OrderDiff {
    /// True when the request is an exact permutation of the owned set
    pub fn is_permutation(&self) -> bool {
        self.extra.is_empty() && self.missing == 0
    }
}

/// Compares a requested ordering against the owned id set
///
/// Fails fast on duplicates; otherwise reports which requested ids fall
/// outside the owned set and how many owned ids were omitted. The caller
/// decides whether extra ids are an authorization or a validation failure
/// (that needs a database probe — see [`reorder_tasks`]).
pub fn diff_order(owned: &HashSet<Uuid>, order: &[Uuid]) -> Result<OrderDiff, OrderingError> {
    let mut seen = HashSet::with_capacity(order.len());
    let mut extra = Vec::new();

    for id in order {
        if !seen.insert(*id) {
            return Err(OrderingError::DuplicateId(*id));
        }
        if !owned.contains(id) {
            extra.push(*id);
        }
    }

    let matched = order.len() - extra.len();
    Ok(OrderDiff {
        extra,
        missing: owned.len() - matched,
    })
}

/// Applies a full reorder of an owner's task list
///
/// Validates that `order` is a permutation of the owner's current task
/// ids, then assigns each task a position equal to its index, committing
/// all updates in one transaction. On any error the stored positions are
/// left exactly as they were.
///
/// # Errors
///
/// - [`OrderingError::DuplicateId`], [`OrderingError::IncompleteOrder`],
///   [`OrderingError::UnknownId`] — the sequence is not a permutation of
///   the owned set;
/// - [`OrderingError::ForeignIds`] — the sequence names tasks owned by
///   someone else;
/// - [`OrderingError::Database`] — the store failed; the transaction is
///   rolled back.
pub async fn reorder_tasks(
    pool: &PgPool,
    owner_id: Uuid,
    order: &[Uuid],
) -> Result<(), OrderingError> {
    let owned: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tasks WHERE user_id = $1")
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
    let owned: HashSet<Uuid> = owned.into_iter().collect();

    let diff = diff_order(&owned, order)?;

    if !diff.extra.is_empty() {
        // Ids outside the owned set: someone else's tasks are rejected
        // wholesale as an authorization failure, ids matching nothing as
        // a validation failure.
        let foreign: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tasks WHERE id = ANY($1)")
            .bind(&diff.extra)
            .fetch_all(pool)
            .await?;

        if !foreign.is_empty() {
            return Err(OrderingError::ForeignIds(foreign));
        }
        return Err(OrderingError::UnknownId(diff.extra[0]));
    }

    if diff.missing > 0 {
        return Err(OrderingError::IncompleteOrder(diff.missing));
    }

    let mut tx = pool.begin().await?;

    for (index, id) in order.iter().enumerate() {
        sqlx::query("UPDATE tasks SET position = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3")
            .bind(index as i32)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::debug!(owner = %owner_id, count = order.len(), "Task list reordered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_exact_permutation_passes() {
        let owned_ids = ids(3);
        let owned: HashSet<Uuid> = owned_ids.iter().copied().collect();

        // Reversed order is still a permutation
        let mut order = owned_ids.clone();
        order.reverse();

        let diff = diff_order(&owned, &order).unwrap();
        assert!(diff.is_permutation());
    }

    #[test]
    fn test_empty_list_accepts_empty_order() {
        let owned = HashSet::new();
        let diff = diff_order(&owned, &[]).unwrap();
        assert!(diff.is_permutation());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let owned_ids = ids(2);
        let owned: HashSet<Uuid> = owned_ids.iter().copied().collect();

        let order = vec![owned_ids[0], owned_ids[1], owned_ids[0]];
        let err = diff_order(&owned, &order).unwrap_err();
        assert!(matches!(err, OrderingError::DuplicateId(id) if id == owned_ids[0]));
    }

    #[test]
    fn test_missing_id_is_reported() {
        let owned_ids = ids(3);
        let owned: HashSet<Uuid> = owned_ids.iter().copied().collect();

        let diff = diff_order(&owned, &owned_ids[..2]).unwrap();
        assert_eq!(diff.missing, 1);
        assert!(diff.extra.is_empty());
        assert!(!diff.is_permutation());
    }

    #[test]
    fn test_extra_id_is_reported() {
        let owned_ids = ids(2);
        let owned: HashSet<Uuid> = owned_ids.iter().copied().collect();

        let stranger = Uuid::new_v4();
        let order = vec![owned_ids[0], owned_ids[1], stranger];

        let diff = diff_order(&owned, &order).unwrap();
        assert_eq!(diff.extra, vec![stranger]);
        assert_eq!(diff.missing, 0);
        assert!(!diff.is_permutation());
    }

    #[test]
    fn test_swapped_in_id_counts_both_ways() {
        // Replacing an owned id with a foreign one is both an omission
        // and an extra; either is enough to reject the request.
        let owned_ids = ids(2);
        let owned: HashSet<Uuid> = owned_ids.iter().copied().collect();

        let order = vec![owned_ids[0], Uuid::new_v4()];
        let diff = diff_order(&owned, &order).unwrap();
        assert_eq!(diff.extra.len(), 1);
        assert_eq!(diff.missing, 1);
    }

    #[test]
    fn test_foreign_rejection_is_authorization() {
        assert!(OrderingError::ForeignIds(vec![Uuid::new_v4()]).is_authorization());
        assert!(!OrderingError::DuplicateId(Uuid::new_v4()).is_authorization());
        assert!(!OrderingError::IncompleteOrder(1).is_authorization());
        assert!(!OrderingError::UnknownId(Uuid::new_v4()).is_authorization());
    }

    // The transactional apply (position == index, all-or-nothing) is
    // covered against a live database in tests/store_tests.rs
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{compute_balance, Cents, Operation};

/// Append-only, insertion-ordered log of a customer's operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement {
    operations: Vec<Operation>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation at the end of the log.
    ///
    /// `created_at` is clamped to the previous entry's timestamp so that
    /// timestamps never decrease along insertion order, even if the wall
    /// clock steps backwards.
    pub fn append(&mut self, mut operation: Operation) -> &Operation {
        if let Some(last) = self.operations.last() {
            if operation.created_at < last.created_at {
                operation.created_at = last.created_at;
            }
        }
        self.operations.push(operation);
        &self.operations[self.operations.len() - 1]
    }

    pub fn all(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations whose `created_at` falls on `date` (UTC calendar day).
    pub fn by_date(&self, date: NaiveDate) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .filter(move |operation| operation.created_at.date_naive() == date)
    }

    /// Recomputed from the full log on every call.
    pub fn balance(&self) -> Cents {
        compute_balance(&self.operations)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::domain::OperationType;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_new_statement_is_empty() {
        let statement = Statement::new();
        assert!(statement.is_empty());
        assert_eq!(statement.balance(), 0);
        assert!(statement.all().is_empty());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut statement = Statement::new();
        statement.append(Operation::credit(1000, at("2024-01-01T09:00:00Z")).with_description("a"));
        statement.append(Operation::debit(100, at("2024-01-01T10:00:00Z")));
        statement.append(Operation::credit(50, at("2024-01-02T08:00:00Z")).with_description("b"));

        let kinds: Vec<_> = statement.all().iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![OperationType::Credit, OperationType::Debit, OperationType::Credit]
        );
        assert_eq!(statement.len(), 3);
        assert_eq!(statement.balance(), 950);
    }

    #[test]
    fn test_append_clamps_backwards_clock() {
        let mut statement = Statement::new();
        let first = at("2024-01-01T12:00:00Z");
        statement.append(Operation::credit(10, first));

        let appended = statement.append(Operation::credit(10, first - Duration::hours(1)));
        assert_eq!(appended.created_at, first);

        let timestamps: Vec<_> = statement.all().iter().map(|o| o.created_at).collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_by_date_filters_on_utc_day() {
        let mut statement = Statement::new();
        statement.append(Operation::credit(100, at("2024-01-01T23:59:59Z")));
        statement.append(Operation::credit(200, at("2024-01-02T00:00:00Z")));
        statement.append(Operation::debit(50, at("2024-01-02T18:30:00Z")));
        statement.append(Operation::credit(300, at("2024-01-03T00:00:01Z")));

        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let amounts: Vec<_> = statement.by_date(day).map(|o| o.amount).collect();
        assert_eq!(amounts, vec![200, 50]);

        let idle = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(statement.by_date(idle).count(), 0);
    }

    #[test]
    fn test_by_date_ignores_offset_of_original_timestamp() {
        // 2024-01-02T01:00+03:00 is 2024-01-01T22:00Z, so it belongs to Jan 1st
        let created_at = DateTime::parse_from_rfc3339("2024-01-02T01:00:00+03:00")
            .unwrap()
            .with_timezone(&Utc);
        let mut statement = Statement::new();
        statement.append(Operation::credit(100, created_at));

        let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan_2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(statement.by_date(jan_1).count(), 1);
        assert_eq!(statement.by_date(jan_2).count(), 0);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut statement = Statement::new();
        statement.append(Operation::credit(100, at("2024-01-01T00:00:00Z")));

        let json = serde_json::to_value(&statement).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["amount"], 100);
    }
}

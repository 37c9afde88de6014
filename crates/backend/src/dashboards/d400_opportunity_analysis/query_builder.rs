use std::collections::BTreeSet;

use super::date_range::DateRange;
use crate::shared::salesforce::{AggregateQuery, CountField, Field, LookupQuery, Predicate};

pub const OPPORTUNITY: &str = "Opportunity";
pub const PRODUCER: &str = "Producer";

pub const CREATED_DATE: &str = "CreatedDate";
pub const TYPE_FIELD: &str = "Type";
pub const PRODUCER_FIELD: &str = "Producer__c";
pub const OWNER_NAME_FIELD: &str = "Owner.Name";

/// Result row keys
pub const COUNT_ALIAS: &str = "oppCount";
pub const PRODUCER_ALIAS: &str = "producerId";
pub const OWNER_ALIAS: &str = "ownerName";

fn created_between(range: &DateRange) -> Predicate {
    Predicate::Between {
        field: CREATED_DATE,
        from: range.start_bound(),
        to: range.end_bound(),
    }
}

fn count_opportunities() -> CountField {
    CountField {
        field: "Id",
        alias: COUNT_ALIAS,
    }
}

/// Query 1: all opportunities in the period, counted by Type
pub fn overall_by_type(range: &DateRange) -> AggregateQuery {
    AggregateQuery {
        entity: OPPORTUNITY,
        group_by: vec![Field::new(TYPE_FIELD)],
        count: count_opportunities(),
        predicates: vec![created_between(range)],
    }
}

/// Query 2: opportunities with a producer, counted by (producer, Type)
pub fn with_producer_by_type(range: &DateRange) -> AggregateQuery {
    AggregateQuery {
        entity: OPPORTUNITY,
        group_by: vec![
            Field::aliased(PRODUCER_FIELD, PRODUCER_ALIAS),
            Field::new(TYPE_FIELD),
        ],
        count: count_opportunities(),
        predicates: vec![created_between(range), Predicate::NotNull(PRODUCER_FIELD)],
    }
}

/// Query 3: opportunities without a producer, counted by (owner name, Type)
pub fn without_producer_by_type(range: &DateRange) -> AggregateQuery {
    AggregateQuery {
        entity: OPPORTUNITY,
        group_by: vec![
            Field::aliased(OWNER_NAME_FIELD, OWNER_ALIAS),
            Field::new(TYPE_FIELD),
        ],
        count: count_opportunities(),
        predicates: vec![created_between(range), Predicate::IsNull(PRODUCER_FIELD)],
    }
}

/// Producer records with the linked internal user's name, for a non-empty id set
pub fn producer_names(ids: &BTreeSet<String>) -> LookupQuery {
    LookupQuery {
        entity: PRODUCER,
        fields: vec!["Id", "InternalUser.FirstName", "InternalUser.LastName"],
        predicates: vec![Predicate::In {
            field: "Id",
            values: ids.iter().cloned().collect(),
        }],
    }
}

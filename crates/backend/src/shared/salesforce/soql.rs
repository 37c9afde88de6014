use chrono::{DateTime, Utc};

/// SOQL datetime literal, e.g. 2024-03-15T00:00:00Z
pub fn datetime_literal(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Single-quoted SOQL string literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Filter condition of a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Inclusive on both ends
    Between {
        field: &'static str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    IsNull(&'static str),
    NotNull(&'static str),
    /// `values` must not be empty
    In {
        field: &'static str,
        values: Vec<String>,
    },
}

impl Predicate {
    pub fn to_soql(&self) -> String {
        match self {
            Predicate::Between { field, from, to } => format!(
                "{field} >= {} AND {field} <= {}",
                datetime_literal(from),
                datetime_literal(to)
            ),
            Predicate::IsNull(field) => format!("{} = null", field),
            Predicate::NotNull(field) => format!("{} != null", field),
            Predicate::In { field, values } => {
                let list: Vec<String> = values.iter().map(|v| quote(v)).collect();
                format!("{} IN ({})", field, list.join(", "))
            }
        }
    }
}

/// Selected field, optionally aliased so the result row uses a fixed key
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub path: &'static str,
    pub alias: Option<&'static str>,
}

impl Field {
    pub const fn new(path: &'static str) -> Self {
        Self { path, alias: None }
    }

    pub const fn aliased(path: &'static str, alias: &'static str) -> Self {
        Self {
            path,
            alias: Some(alias),
        }
    }

    /// Key under which the value appears in a result row
    pub fn key(&self) -> &'static str {
        self.alias.unwrap_or(self.path)
    }

    fn select_expr(&self) -> String {
        match self.alias {
            Some(alias) => format!("{} {}", self.path, alias),
            None => self.path.to_string(),
        }
    }
}

/// COUNT(field) alias
#[derive(Debug, Clone, PartialEq)]
pub struct CountField {
    pub field: &'static str,
    pub alias: &'static str,
}

/// Grouped count: (entity, filter, group-by fields, count field)
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    pub entity: &'static str,
    pub group_by: Vec<Field>,
    pub count: CountField,
    pub predicates: Vec<Predicate>,
}

impl AggregateQuery {
    pub fn to_soql(&self) -> String {
        let mut columns: Vec<String> = self.group_by.iter().map(Field::select_expr).collect();
        columns.push(format!("COUNT({}) {}", self.count.field, self.count.alias));

        let mut soql = format!("SELECT {} FROM {}", columns.join(", "), self.entity);
        push_where(&mut soql, &self.predicates);

        if !self.group_by.is_empty() {
            let group_by: Vec<&str> = self.group_by.iter().map(|f| f.path).collect();
            soql.push_str(&format!(" GROUP BY {}", group_by.join(", ")));
        }
        soql
    }
}

/// Plain record lookup used for secondary name resolution
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery {
    pub entity: &'static str,
    pub fields: Vec<&'static str>,
    pub predicates: Vec<Predicate>,
}

impl LookupQuery {
    pub fn to_soql(&self) -> String {
        let mut soql = format!("SELECT {} FROM {}", self.fields.join(", "), self.entity);
        push_where(&mut soql, &self.predicates);
        soql
    }
}

fn push_where(soql: &mut String, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }
    let conditions: Vec<String> = predicates.iter().map(Predicate::to_soql).collect();
    soql.push_str(" WHERE ");
    soql.push_str(&conditions.join(" AND "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a0B5"), "'a0B5'");
        assert_eq!(quote("O'Brien"), "'O\\'Brien'");
        assert_eq!(quote("back\\slash"), "'back\\\\slash'");
    }

    #[test]
    fn test_aggregate_query() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let query = AggregateQuery {
            entity: "Opportunity",
            group_by: vec![Field::aliased("Owner.Name", "ownerName"), Field::new("Type")],
            count: CountField {
                field: "Id",
                alias: "oppCount",
            },
            predicates: vec![
                Predicate::Between {
                    field: "CreatedDate",
                    from,
                    to,
                },
                Predicate::IsNull("Producer__c"),
            ],
        };

        assert_eq!(
            query.to_soql(),
            "SELECT Owner.Name ownerName, Type, COUNT(Id) oppCount FROM Opportunity \
             WHERE CreatedDate >= 2024-01-01T00:00:00Z AND CreatedDate <= 2024-01-31T23:59:59Z \
             AND Producer__c = null GROUP BY Owner.Name, Type"
        );
        assert_eq!(query.group_by[0].key(), "ownerName");
        assert_eq!(query.group_by[1].key(), "Type");
    }

    #[test]
    fn test_lookup_query() {
        let query = LookupQuery {
            entity: "Producer",
            fields: vec!["Id", "InternalUser.FirstName"],
            predicates: vec![
                Predicate::In {
                    field: "Id",
                    values: vec!["P1".to_string(), "P'2".to_string()],
                },
                Predicate::NotNull("InternalUser.FirstName"),
            ],
        };
        assert_eq!(
            query.to_soql(),
            "SELECT Id, InternalUser.FirstName FROM Producer \
             WHERE Id IN ('P1', 'P\\'2') AND InternalUser.FirstName != null"
        );
    }

    #[test]
    fn test_no_predicates_no_where() {
        let query = LookupQuery {
            entity: "Producer",
            fields: vec!["Id"],
            predicates: vec![],
        };
        assert_eq!(query.to_soql(), "SELECT Id FROM Producer");
        assert_eq!(Predicate::NotNull("Producer__c").to_soql(), "Producer__c != null");
    }
}

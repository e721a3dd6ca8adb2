/// A bind parameter for a raw SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    BigInt(i64),
    Text(String),
}

/// Row-count statement paired with a candidate, with its own bind list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// One guess at how a logical read is expressed against an unknown schema.
///
/// Statements are complete and parameterised (`$1`, `$2`, ...); every
/// selected column is cast to `TEXT` and aliased to the logical name the
/// row type expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub label: &'static str,
    pub sql: String,
    pub params: Vec<SqlParam>,
    pub count: Option<CountQuery>,
}

impl CandidateQuery {
    pub fn new(label: &'static str, sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            label,
            sql: sql.into(),
            params,
            count: None,
        }
    }

    pub fn with_count(mut self, sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        self.count = Some(CountQuery {
            sql: sql.into(),
            params,
        });
        self
    }
}

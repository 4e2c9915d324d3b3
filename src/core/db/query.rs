use serde_json::Value;

/// Every table (and read-only view) the group console touches. The schema
/// itself is owned by the hosted backend; these names are passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Scouts,
    MedicalRecords,
    DocumentationRecords,
    Attendance,
    Dirigentes,
    Activities,
    Transactions,
    Budgets,
    Contacts,
    News,
    Documents,
    SystemUsers,
    AuditLog,
    /// Read-only view over `scouts`.
    InactiveMembers,
    /// Read-only aggregation view over `attendance`.
    AttendanceByGroup,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Scouts => "scouts",
            Table::MedicalRecords => "medical_records",
            Table::DocumentationRecords => "documentation_records",
            Table::Attendance => "attendance",
            Table::Dirigentes => "dirigentes",
            Table::Activities => "activities",
            Table::Transactions => "transactions",
            Table::Budgets => "budgets",
            Table::Contacts => "contacts",
            Table::News => "news",
            Table::Documents => "documents",
            Table::SystemUsers => "system_users",
            Table::AuditLog => "audit_log",
            Table::InactiveMembers => "inactive_members",
            Table::AttendanceByGroup => "attendance_by_group",
        }
    }
}

/// Equality filter on one column. The hosted API only ever receives
/// passthrough `eq` filters; anything richer is out of scope.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Whether a JSON record satisfies this filter.
    pub fn matches(&self, record: &Value) -> bool {
        record.get(self.column) == Some(&self.value)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

/// Fetch options translated by each backend: query-builder calls on the
/// remote side, in-memory filtering on the local side.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub select: Option<&'static str>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: &'static str, descending: bool) -> Self {
        self.order = Some(Order { column, descending });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Total order over the JSON scalar types we sort on. Mixed or non-scalar
/// values compare equal, which leaves their relative input order intact.
pub(crate) fn cmp_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

use serde::{Deserialize, Serialize};

use crate::core::db::model::{parse_date, parse_month};
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow::anyhow!("Unknown transaction kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceCategory {
    Mensalidades,
    Eventos,
    Materiais,
    Uniformes,
    Doacoes,
    Infraestrutura,
    Outros,
}

impl FinanceCategory {
    pub const ALL: [FinanceCategory; 7] = [
        FinanceCategory::Mensalidades,
        FinanceCategory::Eventos,
        FinanceCategory::Materiais,
        FinanceCategory::Uniformes,
        FinanceCategory::Doacoes,
        FinanceCategory::Infraestrutura,
        FinanceCategory::Outros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FinanceCategory::Mensalidades => "mensalidades",
            FinanceCategory::Eventos => "eventos",
            FinanceCategory::Materiais => "materiais",
            FinanceCategory::Uniformes => "uniformes",
            FinanceCategory::Doacoes => "doacoes",
            FinanceCategory::Infraestrutura => "infraestrutura",
            FinanceCategory::Outros => "outros",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FinanceCategory::Mensalidades => "Mensalidades",
            FinanceCategory::Eventos => "Eventos",
            FinanceCategory::Materiais => "Materiais",
            FinanceCategory::Uniformes => "Uniformes",
            FinanceCategory::Doacoes => "Doações",
            FinanceCategory::Infraestrutura => "Infraestrutura",
            FinanceCategory::Outros => "Outros",
        }
    }
}

impl std::str::FromStr for FinanceCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FinanceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown finance category: {s}"))
    }
}

impl std::fmt::Display for FinanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Amounts are integer cents to keep the arithmetic exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: FinanceCategory,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub date: String,
    pub description: String,
    pub category: FinanceCategory,
    pub kind: TransactionKind,
    pub amount_cents: i64,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if parse_date(&self.date).is_err() {
            issues.push("date", format!("not an ISO date: {}", self.date));
        }
        if self.description.trim().is_empty() {
            issues.push("description", "must not be empty");
        }
        if self.amount_cents <= 0 {
            issues.push("amount_cents", "must be positive");
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: FinanceCategory,
    pub limit_cents: i64,
    /// `YYYY-MM`.
    pub period: String,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub category: FinanceCategory,
    pub limit_cents: i64,
    pub period: String,
}

impl NewBudget {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.limit_cents <= 0 {
            issues.push("limit_cents", "must be positive");
        }
        if parse_month(&self.period).is_err() {
            issues.push("period", format!("expected YYYY-MM, got {}", self.period));
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub category: FinanceCategory,
    pub period: String,
    pub limit_cents: i64,
    pub spent_cents: i64,
    pub used_percent: f64,
}

impl BudgetUsage {
    pub fn percent(spent_cents: i64, limit_cents: i64) -> f64 {
        if limit_cents <= 0 {
            return 0.0;
        }
        (spent_cents as f64 / limit_cents as f64 * 1000.0).round() / 10.0
    }
}

/// Computed from fetched transactions and budgets, never stored.
#[derive(Debug, Clone)]
pub struct FinanceSummary {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
    pub budgets: Vec<BudgetUsage>,
}

pub trait FinanceRepository {
    fn get_transactions(&self) -> impl Future<Output = anyhow::Result<Vec<Transaction>>>;
    fn get_transactions_in_category(
        &self,
        category: FinanceCategory,
    ) -> impl Future<Output = anyhow::Result<Vec<Transaction>>>;
    fn add_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> impl Future<Output = anyhow::Result<Transaction>>;
    fn delete_transaction(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = anyhow::Result<()>>;

    fn get_budgets(&self) -> impl Future<Output = anyhow::Result<Vec<Budget>>>;
    /// Inserts or replaces the budget for `(category, period)`.
    fn set_budget(&self, budget: &NewBudget) -> impl Future<Output = anyhow::Result<Budget>>;
    fn delete_budget(&self, budget: Budget) -> impl Future<Output = anyhow::Result<()>>;

    /// Totals plus per-budget utilization percentages. A budget's spent
    /// figure sums expense transactions of its category dated inside its
    /// period.
    fn get_finance_summary(&self) -> impl Future<Output = anyhow::Result<FinanceSummary>>;
}

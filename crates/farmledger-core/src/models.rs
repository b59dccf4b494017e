//! Domain models for Farm Ledger
//!
//! Source records (transactions, orders, contracts) are read-only inputs.
//! Summaries, health scores and ledgers are derived values recomputed on
//! every request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Currency used when a record does not specify one
pub const DEFAULT_CURRENCY: &str = "INR";

// ========== Categories ==========

/// Income category buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    CropSales,
    LivestockSales,
    EquipmentRental,
    LandLease,
    GovernmentSubsidy,
    InsuranceClaim,
    OtherIncome,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 7] = [
        Self::CropSales,
        Self::LivestockSales,
        Self::EquipmentRental,
        Self::LandLease,
        Self::GovernmentSubsidy,
        Self::InsuranceClaim,
        Self::OtherIncome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CropSales => "crop_sales",
            Self::LivestockSales => "livestock_sales",
            Self::EquipmentRental => "equipment_rental",
            Self::LandLease => "land_lease",
            Self::GovernmentSubsidy => "government_subsidy",
            Self::InsuranceClaim => "insurance_claim",
            Self::OtherIncome => "other_income",
        }
    }
}

impl std::str::FromStr for IncomeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown income category: {}", s))
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense category buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Seeds,
    Fertilizers,
    Pesticides,
    EquipmentPurchase,
    EquipmentRental,
    EquipmentMaintenance,
    Irrigation,
    Labor,
    LandLease,
    Fuel,
    Electricity,
    Transportation,
    Storage,
    Marketing,
    LoanPayment,
    Insurance,
    Taxes,
    OtherExpense,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 18] = [
        Self::Seeds,
        Self::Fertilizers,
        Self::Pesticides,
        Self::EquipmentPurchase,
        Self::EquipmentRental,
        Self::EquipmentMaintenance,
        Self::Irrigation,
        Self::Labor,
        Self::LandLease,
        Self::Fuel,
        Self::Electricity,
        Self::Transportation,
        Self::Storage,
        Self::Marketing,
        Self::LoanPayment,
        Self::Insurance,
        Self::Taxes,
        Self::OtherExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeds => "seeds",
            Self::Fertilizers => "fertilizers",
            Self::Pesticides => "pesticides",
            Self::EquipmentPurchase => "equipment_purchase",
            Self::EquipmentRental => "equipment_rental",
            Self::EquipmentMaintenance => "equipment_maintenance",
            Self::Irrigation => "irrigation",
            Self::Labor => "labor",
            Self::LandLease => "land_lease",
            Self::Fuel => "fuel",
            Self::Electricity => "electricity",
            Self::Transportation => "transportation",
            Self::Storage => "storage",
            Self::Marketing => "marketing",
            Self::LoanPayment => "loan_payment",
            Self::Insurance => "insurance",
            Self::Taxes => "taxes",
            Self::OtherExpense => "other_expense",
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown expense category: {}", s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ========== Ledger Source Records ==========

/// Income or expense side of a manual transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    Income {
        category: IncomeCategory,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quantity: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price_per_unit: Option<f64>,
    },
    Expense {
        category: ExpenseCategory,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vendor: Option<String>,
    },
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income { .. } => "income",
            Self::Expense { .. } => "expense",
        }
    }

    /// snake_case name of the category, whichever side it is on
    pub fn category_str(&self) -> &'static str {
        match self {
            Self::Income { category, .. } => category.as_str(),
            Self::Expense { category, .. } => category.as_str(),
        }
    }
}

/// A manually entered income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Millisecond epoch timestamp
    pub date: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Transaction {
    /// New income transaction with no crop, quantity or unit price
    pub fn income(
        id: impl Into<String>,
        user_id: impl Into<String>,
        amount: f64,
        date: i64,
        category: IncomeCategory,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            amount,
            currency: default_currency(),
            date,
            description: String::new(),
            crop_name: None,
            kind: TransactionKind::Income {
                category,
                quantity: None,
                price_per_unit: None,
            },
        }
    }

    /// New expense transaction with no crop or vendor
    pub fn expense(
        id: impl Into<String>,
        user_id: impl Into<String>,
        amount: f64,
        date: i64,
        category: ExpenseCategory,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            amount,
            currency: default_currency(),
            date,
            description: String::new(),
            crop_name: None,
            kind: TransactionKind::Expense {
                category,
                vendor: None,
            },
        }
    }

    pub fn with_crop(mut self, crop_name: impl Into<String>) -> Self {
        self.crop_name = Some(crop_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        if let TransactionKind::Expense { vendor: v, .. } = &mut self.kind {
            *v = Some(vendor.into());
        }
        self
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income { .. })
    }
}

/// Marketplace order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "returned" => Ok(Self::Returned),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item within a marketplace order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub total_price: f64,
    #[serde(default)]
    pub is_rental: bool,
}

/// A marketplace order: income for the seller, expense for the buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub seller_id: String,
    pub buyer_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    /// Millisecond epoch timestamp
    pub created_at: i64,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// New empty order; `with_item` grows both the items and the total
    pub fn new(
        id: impl Into<String>,
        seller_id: impl Into<String>,
        buyer_id: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            seller_id: seller_id.into(),
            buyer_id: buyer_id.into(),
            items: vec![],
            total_amount: 0.0,
            created_at,
            status: OrderStatus::default(),
        }
    }

    pub fn with_item(mut self, product_name: impl Into<String>, total_price: f64) -> Self {
        self.items.push(OrderItem {
            product_name: product_name.into(),
            total_price,
            is_rental: false,
        });
        self.total_amount += total_price;
        self
    }

    pub fn with_rental_item(mut self, product_name: impl Into<String>, total_price: f64) -> Self {
        self.items.push(OrderItem {
            product_name: product_name.into(),
            total_price,
            is_rental: true,
        });
        self.total_amount += total_price;
        self
    }

    /// Override the order total (it need not match the item sum)
    pub fn with_total(mut self, total_amount: f64) -> Self {
        self.total_amount = total_amount;
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn has_rental(&self) -> bool {
        self.items.iter().any(|i| i.is_rental)
    }
}

/// One installment paid against a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractPayment {
    pub amount: f64,
    /// Millisecond epoch timestamp
    pub date: i64,
}

/// A bilateral contract: payments are income for the creator and expense
/// for the counterparty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub creator_id: String,
    pub counterparty_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub payments: BTreeMap<String, ContractPayment>,
}

impl Contract {
    pub fn new(
        id: impl Into<String>,
        creator_id: impl Into<String>,
        counterparty_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            creator_id: creator_id.into(),
            counterparty_id: counterparty_id.into(),
            title: None,
            payments: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_payment(mut self, payment_id: impl Into<String>, amount: f64, date: i64) -> Self {
        self.payments
            .insert(payment_id.into(), ContractPayment { amount, date });
        self
    }

    /// Which side of this contract the user is on
    pub fn role_of(&self, user_id: &str) -> PartyRole {
        if self.creator_id == user_id {
            PartyRole::Receiver
        } else {
            PartyRole::Payer
        }
    }
}

/// How a shared record reads from one party's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    /// Money flows in (order seller, contract creator)
    Receiver,
    /// Money flows out (order buyer, contract counterparty)
    Payer,
}

/// A bundle of source records, as used by bulk import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecords {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

// ========== Time Windows ==========

/// Inclusive millisecond time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Build a window, rejecting `end < start`
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The window `[now - days, now]`
    pub fn trailing_days(now: i64, days: i64) -> Self {
        Self {
            start: now - days * DAY_MS,
            end: now,
        }
    }

    /// The window of equal length that ends one millisecond before this one
    /// starts, so the pair is contiguous and never shares a timestamp
    pub fn preceding(&self) -> Self {
        let len = self.end - self.start;
        let end = self.start - 1;
        Self {
            start: end - len,
            end,
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts <= self.end
    }
}

// ========== Financial Summary ==========

/// Income, expense and profit attributed to one crop
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropProfit {
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

/// Category-bucketed totals for one user over one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub user_id: String,
    pub start_date: i64,
    pub end_date: i64,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_profit: f64,
    pub income_by_category: BTreeMap<IncomeCategory, f64>,
    pub expense_by_category: BTreeMap<ExpenseCategory, f64>,
    pub crop_profitability: BTreeMap<String, CropProfit>,
}

impl FinancialSummary {
    /// Empty summary with every category bucket present at zero
    pub fn new(user_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            user_id: user_id.into(),
            start_date: window.start,
            end_date: window.end,
            total_income: 0.0,
            total_expense: 0.0,
            net_profit: 0.0,
            income_by_category: IncomeCategory::ALL.iter().map(|c| (*c, 0.0)).collect(),
            expense_by_category: ExpenseCategory::ALL.iter().map(|c| (*c, 0.0)).collect(),
            crop_profitability: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Expense as a fraction of income; None when there is no income
    pub fn expense_ratio(&self) -> Option<f64> {
        (self.total_income > 0.0).then(|| self.total_expense / self.total_income)
    }

    /// Net profit as a fraction of income; None when there is no income
    pub fn savings_ratio(&self) -> Option<f64> {
        (self.total_income > 0.0).then(|| self.net_profit / self.total_income)
    }

    pub fn income_for(&self, category: IncomeCategory) -> f64 {
        self.income_by_category.get(&category).copied().unwrap_or(0.0)
    }

    pub fn expense_for(&self, category: ExpenseCategory) -> f64 {
        self.expense_by_category.get(&category).copied().unwrap_or(0.0)
    }
}

// ========== Health Score ==========

/// The five health sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategoryId {
    Income,
    Expenses,
    Debt,
    Savings,
    Planning,
}

impl HealthCategoryId {
    pub const ALL: [HealthCategoryId; 5] = [
        Self::Income,
        Self::Expenses,
        Self::Debt,
        Self::Savings,
        Self::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::Debt => "debt",
            Self::Savings => "savings",
            Self::Planning => "planning",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Income => "Income Stability",
            Self::Expenses => "Expense Management",
            Self::Debt => "Debt Management",
            Self::Savings => "Savings & Reserves",
            Self::Planning => "Financial Planning",
        }
    }

    /// Cap for this sub-score
    pub fn max_score(&self) -> u32 {
        match self {
            Self::Income => 60,
            Self::Expenses => 35,
            Self::Debt => 15,
            Self::Savings => 20,
            Self::Planning => 10,
        }
    }
}

impl std::fmt::Display for HealthCategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored component of the health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCategory {
    pub id: HealthCategoryId,
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub description: String,
    pub recommendations: Vec<String>,
}

/// Severity of a health alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Danger => 3,
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A threshold alert raised by the health scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAlert {
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
}

impl HealthAlert {
    pub fn new(id: impl Into<String>, severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
        }
    }
}

/// Net-profit trend deltas in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trends {
    pub last_month: i64,
    pub last_quarter: i64,
    pub last_year: i64,
}

/// Composite financial health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall_score: u32,
    pub categories: Vec<HealthCategory>,
    pub alerts: Vec<HealthAlert>,
    pub trends: Trends,
    /// Trailing-year summary the score was computed from
    pub summary: FinancialSummary,
}

impl HealthScore {
    pub fn category(&self, id: HealthCategoryId) -> Option<&HealthCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn score_for(&self, id: HealthCategoryId) -> u32 {
        self.category(id).map(|c| c.score).unwrap_or(0)
    }
}

// ========== Unified Ledger ==========

/// What produced a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    Income,
    Expense,
    Sale,
    Purchase,
    Rental,
    ContractPaymentReceived,
    ContractPaymentMade,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Rental => "rental",
            Self::ContractPaymentReceived => "contract_payment_received",
            Self::ContractPaymentMade => "contract_payment_made",
        }
    }

    pub fn is_inflow(&self) -> bool {
        matches!(
            self,
            Self::Income | Self::Sale | Self::ContractPaymentReceived
        )
    }
}

impl std::fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the unified ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub date: i64,
    pub kind: LedgerEntryKind,
    pub description: String,
    /// Display label of the category
    pub category: String,
    /// Signed amount: positive for money in, negative for money out
    pub amount: f64,
    pub counterparty: Option<String>,
    pub contract_id: Option<String>,
}

/// All three ledger sources merged into one time-ordered list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub user_id: String,
    pub start_date: i64,
    pub end_date: i64,
    /// Newest first
    pub entries: Vec<LedgerEntry>,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_profit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_round_trip_names() {
        assert_eq!(IncomeCategory::CropSales.as_str(), "crop_sales");
        assert_eq!(
            ExpenseCategory::from_str("equipment_rental").unwrap(),
            ExpenseCategory::EquipmentRental
        );
        assert!(IncomeCategory::from_str("lottery").is_err());
    }

    #[test]
    fn test_summary_is_seeded_with_every_bucket() {
        let window = TimeWindow::new(0, 10).unwrap();
        let summary = FinancialSummary::new("u1", window);

        assert_eq!(summary.income_by_category.len(), IncomeCategory::ALL.len());
        assert_eq!(summary.expense_by_category.len(), ExpenseCategory::ALL.len());
        assert!(summary.income_by_category.values().all(|v| *v == 0.0));
        assert!(summary.expense_ratio().is_none());
    }

    #[test]
    fn test_time_window_rejects_inverted_bounds() {
        let err = TimeWindow::new(10, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeWindow { start: 10, end: 5 }));
        assert!(TimeWindow::new(5, 5).is_ok());
    }

    #[test]
    fn test_time_window_bounds_are_inclusive() {
        let window = TimeWindow::new(100, 200).unwrap();
        assert!(window.contains(100));
        assert!(window.contains(200));
        assert!(!window.contains(99));
        assert!(!window.contains(201));
    }

    #[test]
    fn test_preceding_window_is_contiguous_and_disjoint() {
        let now = 1_000 * DAY_MS;
        let last = TimeWindow::trailing_days(now, 30);
        let previous = last.preceding();

        assert_eq!(previous.end, last.start - 1);
        assert_eq!(previous.end - previous.start, last.end - last.start);
        assert!(!previous.contains(last.start));
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction::expense("t1", "u1", 250.0, 42, ExpenseCategory::Seeds)
            .with_vendor("Agro Depot")
            .with_crop("Wheat");
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["kind"], "expense");
        assert_eq!(json["category"], "seeds");
        assert_eq!(json["vendor"], "Agro Depot");

        let parsed: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_transaction_json_defaults() {
        let parsed: Transaction = serde_json::from_str(
            r#"{"id":"t9","user_id":"u1","amount":10.0,"date":5,"kind":"income","category":"crop_sales"}"#,
        )
        .unwrap();

        assert_eq!(parsed.currency, DEFAULT_CURRENCY);
        assert!(parsed.is_income());
        assert_eq!(parsed.kind.category_str(), "crop_sales");
    }

    #[test]
    fn test_contract_role() {
        let contract = Contract::new("c1", "farmer", "buyer");
        assert_eq!(contract.role_of("farmer"), PartyRole::Receiver);
        assert_eq!(contract.role_of("buyer"), PartyRole::Payer);
    }

    #[test]
    fn test_alert_severity_priority() {
        assert!(AlertSeverity::Danger.priority() > AlertSeverity::Warning.priority());
        assert!(AlertSeverity::Warning.priority() > AlertSeverity::Info.priority());
    }
}

use crate::application::registry::{Pagination, RegistrationService};
use crate::domain::coordinator::{Coordinator, CoordinatorId};
use crate::domain::money::Amount;
use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::domain::registration::Registration;
use crate::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const RECENT_PAYMENTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct MyPaymentsQuery {
    pub status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Totals over every registration a coordinator has processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorStatistics {
    /// Registrations matching the current filter.
    pub total_payments: usize,
    pub total_amount: Amount,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub pending_count: usize,
    pub cash_amount: Amount,
    pub upi_amount: Amount,
}

#[derive(Debug, Clone)]
pub struct MyPayments {
    pub payments: Vec<Registration>,
    pub pagination: Pagination,
    pub statistics: CoordinatorStatistics,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTotals {
    pub count: usize,
    pub paid: Amount,
    pub due: Amount,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorTotals {
    pub count: usize,
    pub collected: Amount,
}

#[derive(Debug, Clone)]
pub struct PaymentSummary {
    pub total_registrations: usize,
    pub total_due: Amount,
    pub total_paid: Amount,
    pub by_status: BTreeMap<&'static str, StatusTotals>,
    pub by_coordinator: BTreeMap<CoordinatorId, CoordinatorTotals>,
    /// Percentage of registrations fully paid, one decimal place.
    pub collection_rate: Decimal,
    pub recent_payments: Vec<Registration>,
}

/// Read-only aggregation over registrations.
pub struct ReportingService {
    registry: Arc<RegistrationService>,
}

fn collection_rate(paid: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(paid) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

fn newest_payment_first(a: &Registration, b: &Registration) -> std::cmp::Ordering {
    b.payment.paid_at.cmp(&a.payment.paid_at)
}

impl ReportingService {
    pub fn new(registry: Arc<RegistrationService>) -> Self {
        Self { registry }
    }

    async fn processed_by(&self, coordinator: &CoordinatorId) -> Result<Vec<Registration>> {
        Ok(self
            .registry
            .all()
            .await?
            .into_iter()
            .filter(|r| r.payment.processed_by.as_ref() == Some(coordinator))
            .collect())
    }

    /// Payments the coordinator has handled, with their personal totals.
    pub async fn my_payments(
        &self,
        coordinator: &Coordinator,
        query: MyPaymentsQuery,
    ) -> Result<MyPayments> {
        let processed = self.processed_by(&coordinator.id).await?;

        let mut statistics = CoordinatorStatistics::default();
        for r in &processed {
            statistics.total_amount += r.payment.paid;
            match r.payment.status {
                PaymentStatus::Paid => {
                    statistics.paid_count += 1;
                    match r.payment.method {
                        Some(PaymentMethod::Cash) => statistics.cash_amount += r.payment.paid,
                        Some(PaymentMethod::Upi) => statistics.upi_amount += r.payment.paid,
                        _ => {}
                    }
                }
                PaymentStatus::Pending => statistics.pending_count += 1,
                PaymentStatus::Unpaid => statistics.unpaid_count += 1,
                PaymentStatus::Failed => {}
            }
        }

        let mut matching: Vec<Registration> = processed
            .into_iter()
            .filter(|r| query.status.is_none_or(|s| r.payment.status == s))
            .filter(|r| query.search.as_deref().is_none_or(|s| r.matches_search(s)))
            .collect();
        matching.sort_by(newest_payment_first);
        statistics.total_payments = matching.len();

        let (payments, pagination) = Pagination::paginate(matching, query.page, query.limit);
        Ok(MyPayments {
            payments,
            pagination,
            statistics,
        })
    }

    /// Counts and sums grouped by status and by coordinator. Admins see the
    /// whole desk; coordinators see only what they processed.
    pub async fn summary(&self, viewer: &Coordinator) -> Result<PaymentSummary> {
        let scope = if viewer.is_admin() {
            self.registry.all().await?
        } else {
            self.processed_by(&viewer.id).await?
        };

        let mut by_status: BTreeMap<&'static str, StatusTotals> = PaymentStatus::ALL
            .iter()
            .map(|s| (s.as_str(), StatusTotals::default()))
            .collect();
        let mut by_coordinator: BTreeMap<CoordinatorId, CoordinatorTotals> = BTreeMap::new();
        let mut total_due = Amount::ZERO;
        let mut total_paid = Amount::ZERO;

        for r in &scope {
            let entry = by_status.entry(r.payment.status.as_str()).or_default();
            entry.count += 1;
            entry.paid += r.payment.paid;
            entry.due += r.payment.amount_due;
            total_due += r.payment.amount_due;
            total_paid += r.payment.paid;

            if let Some(by) = &r.payment.processed_by {
                let entry = by_coordinator.entry(by.clone()).or_default();
                entry.count += 1;
                entry.collected += r.payment.paid;
            }
        }

        let paid_count = by_status
            .get(PaymentStatus::Paid.as_str())
            .map_or(0, |t| t.count);

        let mut recent_payments: Vec<Registration> = scope
            .iter()
            .filter(|r| r.payment.status == PaymentStatus::Paid && r.payment.paid_at.is_some())
            .cloned()
            .collect();
        recent_payments.sort_by(newest_payment_first);
        recent_payments.truncate(RECENT_PAYMENTS);

        Ok(PaymentSummary {
            total_registrations: scope.len(),
            total_due,
            total_paid,
            by_status,
            by_coordinator,
            collection_rate: collection_rate(paid_count, scope.len()),
            recent_payments,
        })
    }
}

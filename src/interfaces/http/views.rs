//! Response bodies. Money goes out as JSON numbers.

use crate::application::registry::Pagination;
use crate::application::reporting::{CoordinatorStatistics, PaymentSummary};
use crate::application::tasks::TaskStats;
use crate::domain::coordinator::{Coordinator, CoordinatorId, Role};
use crate::domain::event::RegisteredEvent;
use crate::domain::payment::{PaymentMethod, PaymentRecord, PaymentStatus};
use crate::domain::registration::{
    Gender, ParticipationType, RegisterId, Registration, TeamMember, UserType,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorView {
    pub id: CoordinatorId,
    pub name: String,
    pub role: Role,
}

impl From<Coordinator> for CoordinatorView {
    fn from(c: Coordinator) -> Self {
        Self {
            id: c.id,
            name: c.name,
            role: c.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_due: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub method: Option<PaymentMethod>,
    pub processed_by: Option<CoordinatorId>,
    pub notes: String,
    pub transaction_id: Option<String>,
}

impl From<PaymentRecord> for PaymentView {
    fn from(p: PaymentRecord) -> Self {
        Self {
            status: p.status,
            amount_due: p.amount_due.normalized(),
            paid: p.paid.normalized(),
            remaining: p.remaining().normalized(),
            paid_at: p.paid_at,
            method: p.method,
            processed_by: p.processed_by,
            notes: p.notes,
            transaction_id: p.transaction_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    pub register_id: RegisterId,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub roll_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub user_type: UserType,
    pub participation_type: ParticipationType,
    pub team_members: Vec<TeamMember>,
    pub registered_events: Vec<RegisteredEvent>,
    /// First registered event, or the registration category.
    pub event: String,
    pub payment: PaymentView,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationView {
    fn from(r: Registration) -> Self {
        let event = r.display_event();
        Self {
            register_id: r.register_id,
            user_id: r.user_id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            college: r.college,
            department: r.department,
            year: r.year,
            roll_number: r.roll_number,
            date_of_birth: r.date_of_birth,
            gender: r.gender,
            user_type: r.user_type,
            participation_type: r.participation_type,
            team_members: r.team_members,
            registered_events: r.registered_events,
            event,
            payment: r.payment.into(),
            active: r.active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub fn registrations(list: Vec<Registration>) -> Vec<RegistrationView> {
    list.into_iter().map(RegistrationView::from).collect()
}

#[derive(Debug, Serialize)]
pub struct PaginationView {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
}

impl From<Pagination> for PaginationView {
    fn from(p: Pagination) -> Self {
        Self {
            current: p.current,
            pages: p.pages,
            total: p.total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsView {
    pub total_payments: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub pending_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub upi_amount: Decimal,
}

impl From<CoordinatorStatistics> for StatisticsView {
    fn from(s: CoordinatorStatistics) -> Self {
        Self {
            total_payments: s.total_payments,
            total_amount: s.total_amount.normalized(),
            paid_count: s.paid_count,
            unpaid_count: s.unpaid_count,
            pending_count: s.pending_count,
            cash_amount: s.cash_amount.normalized(),
            upi_amount: s.upi_amount.normalized(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub due: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_registrations: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_due: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    pub by_status: BTreeMap<&'static str, GroupView>,
    pub by_coordinator: BTreeMap<CoordinatorId, GroupView>,
    #[serde(with = "rust_decimal::serde::float")]
    pub collection_rate: Decimal,
    pub recent_payments: Vec<RegistrationView>,
}

impl From<PaymentSummary> for SummaryView {
    fn from(s: PaymentSummary) -> Self {
        Self {
            total_registrations: s.total_registrations,
            total_due: s.total_due.normalized(),
            total_paid: s.total_paid.normalized(),
            by_status: s
                .by_status
                .into_iter()
                .map(|(status, t)| {
                    let view = GroupView {
                        count: t.count,
                        amount: t.paid.normalized(),
                        due: Some(t.due.normalized()),
                    };
                    (status, view)
                })
                .collect(),
            by_coordinator: s
                .by_coordinator
                .into_iter()
                .map(|(id, t)| {
                    let view = GroupView {
                        count: t.count,
                        amount: t.collected.normalized(),
                        due: None,
                    };
                    (id, view)
                })
                .collect(),
            collection_rate: s.collection_rate,
            recent_payments: registrations(s.recent_payments),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsView {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub completion_rate: Decimal,
}

impl From<TaskStats> for TaskStatsView {
    fn from(s: TaskStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            completed: s.completed,
            completion_rate: s.completion_rate,
        }
    }
}

use crate::domain::coordinator::Coordinator;
use crate::domain::fee::FeeSchedule;
use crate::domain::money::Amount;
use crate::domain::payment::{PaymentAmendment, PaymentMethod, PaymentStatus};
use crate::domain::ports::RegistrationStoreBox;
use crate::domain::registration::{
    NewRegistration, ParticipationType, RegisterId, Registration, RegistrationUpdate, UserType,
};
use crate::error::{RegistryError, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const UNPAID_LIMIT: usize = 100;

/// Filters for listing registrations. Pages are 1-based.
#[derive(Debug, Clone, Default)]
pub struct RegistrationQuery {
    pub status: Option<PaymentStatus>,
    pub user_type: Option<UserType>,
    pub participation_type: Option<ParticipationType>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
}

impl Pagination {
    /// Cuts one page out of `items`, returning it with the page metadata.
    pub fn paginate<T>(items: Vec<T>, page: Option<usize>, limit: Option<usize>) -> (Vec<T>, Self) {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total = items.len();
        let slice = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        (
            slice,
            Self {
                current: page,
                pages: total.div_ceil(limit),
                total,
            },
        )
    }
}

/// A payment request as received from a coordinator.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MarkPaidRequest {
    pub amount: Option<Amount>,
    pub method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

/// Registration desk and payment processor.
///
/// Owns the registration store and the fee schedule. Every mutation runs
/// under `write_lock`, so two coordinators recording money for the same
/// participant never overwrite each other's update.
pub struct RegistrationService {
    store: RegistrationStoreBox,
    fees: FeeSchedule,
    write_lock: Mutex<()>,
}

impl RegistrationService {
    pub fn new(store: RegistrationStoreBox, fees: FeeSchedule) -> Self {
        Self {
            store,
            fees,
            write_lock: Mutex::new(()),
        }
    }

    pub fn fee_for(&self, registration: &Registration) -> Amount {
        self.fees.fee_for(
            registration.user_type,
            registration.participation_type,
            &registration.college,
        )
    }

    #[instrument(skip(self, signup), fields(user_id = %signup.user_id))]
    pub async fn register(&self, signup: NewRegistration) -> Result<Registration> {
        let _guard = self.write_lock.lock().await;

        let existing = self.store.get_all().await?;
        let user_id = signup.user_id.trim().to_uppercase();
        if !user_id.is_empty() && existing.iter().any(|r| r.user_id == user_id) {
            return Err(RegistryError::conflict(format!(
                "User {user_id} is already registered"
            )));
        }

        let now = Utc::now();
        let ids: Vec<RegisterId> = existing.into_iter().map(|r| r.register_id).collect();
        let register_id = RegisterId::next_for(now, &ids);
        let fee = self.fees.fee_for(signup.user_type, signup.participation_type, &signup.college);
        let registration = signup.into_registration(register_id, fee, now)?;

        self.store.store(registration.clone()).await?;
        info!(register_id = %registration.register_id, fee = %fee, "Registered");
        Ok(registration)
    }

    pub async fn find(&self, key: &str) -> Result<Registration> {
        self.store
            .find(key)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("Registration {}", key.trim())))
    }

    /// Every registration, newest first.
    pub async fn all(&self) -> Result<Vec<Registration>> {
        let mut all = self.store.get_all().await?;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    pub async fn list(&self, query: RegistrationQuery) -> Result<(Vec<Registration>, Pagination)> {
        let mut matching: Vec<Registration> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|r| query.status.is_none_or(|s| r.payment.status == s))
            .filter(|r| query.user_type.is_none_or(|t| r.user_type == t))
            .filter(|r| query.participation_type.is_none_or(|p| r.participation_type == p))
            .filter(|r| query.search.as_deref().is_none_or(|s| r.matches_search(s)))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Pagination::paginate(matching, query.page, query.limit))
    }

    /// Registrations still owing money, newest first.
    pub async fn unpaid(&self, limit: Option<usize>) -> Result<Vec<Registration>> {
        let mut outstanding: Vec<Registration> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.payment.status.is_outstanding())
            .collect();
        outstanding.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        outstanding.truncate(limit.unwrap_or(UNPAID_LIMIT));
        Ok(outstanding)
    }

    pub async fn update(&self, key: &str, update: RegistrationUpdate) -> Result<Registration> {
        let _guard = self.write_lock.lock().await;
        let mut registration = self.find(key).await?;
        update.apply(&mut registration, Utc::now())?;
        registration.payment.amount_due = self.fee_for(&registration);
        self.store.store(registration.clone()).await?;
        Ok(registration)
    }

    pub async fn delete(&self, key: &str) -> Result<RegisterId> {
        let _guard = self.write_lock.lock().await;
        let registration = self.find(key).await?;
        self.store.remove(&registration.register_id).await?;
        info!(register_id = %registration.register_id, "Deleted registration");
        Ok(registration.register_id)
    }

    /// Runs `apply` against the current state of one registration and
    /// persists the result.
    async fn mutate_payment<F>(&self, key: &str, apply: F) -> Result<Registration>
    where
        F: FnOnce(&mut Registration, Amount) -> Result<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut registration = self.find(key).await?;
        let fee = self.fee_for(&registration);
        apply(&mut registration, fee)?;
        registration.updated_at = Utc::now();
        self.store.store(registration.clone()).await?;
        Ok(registration)
    }

    #[instrument(skip(self, by, request), fields(coordinator = %by.id, amount = %request.amount))]
    pub async fn process_payment(
        &self,
        key: &str,
        by: &Coordinator,
        request: PaymentRequest,
    ) -> Result<Registration> {
        let registration = self
            .mutate_payment(key, |r, fee| {
                r.payment.record(
                    request.amount,
                    request.method,
                    request.notes,
                    by.id.clone(),
                    fee,
                    Utc::now(),
                )?;
                r.payment.attach_reference(request.transaction_id);
                Ok(())
            })
            .await?;
        info!(
            register_id = %registration.register_id,
            status = %registration.payment.status,
            paid = %registration.payment.paid,
            "Payment processed"
        );
        Ok(registration)
    }

    pub async fn mark_paid(
        &self,
        key: &str,
        by: &Coordinator,
        request: MarkPaidRequest,
    ) -> Result<Registration> {
        let registration = self
            .mutate_payment(key, |r, fee| {
                r.payment.mark_paid(
                    request.amount,
                    request.method,
                    request.notes,
                    by.id.clone(),
                    fee,
                    Utc::now(),
                )
            })
            .await?;
        info!(register_id = %registration.register_id, coordinator = %by.id, "Marked as paid");
        Ok(registration)
    }

    pub async fn amend_payment(
        &self,
        key: &str,
        by: &Coordinator,
        amendment: PaymentAmendment,
    ) -> Result<Registration> {
        let registration = self
            .mutate_payment(key, |r, fee| {
                r.payment.amend(amendment, by.id.clone(), fee, Utc::now())
            })
            .await?;
        info!(
            register_id = %registration.register_id,
            status = %registration.payment.status,
            coordinator = %by.id,
            "Payment amended"
        );
        Ok(registration)
    }

    pub async fn reset_payment(&self, key: &str, by: &Coordinator) -> Result<Registration> {
        let registration = self
            .mutate_payment(key, |r, _fee| {
                r.payment.reset();
                Ok(())
            })
            .await?;
        info!(register_id = %registration.register_id, coordinator = %by.id, "Payment reset");
        Ok(registration)
    }

    /// Writes a registration back unchanged in shape; used by the event
    /// desk when it appends event signups.
    pub(crate) async fn save(&self, registration: Registration) -> Result<()> {
        self.store.store(registration).await
    }

    pub(crate) fn lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coordinator::Role;
    use crate::infrastructure::in_memory::InMemoryRegistrationStore;
    use rust_decimal_macros::dec;

    fn service() -> RegistrationService {
        RegistrationService::new(
            Box::new(InMemoryRegistrationStore::new()),
            FeeSchedule::default(),
        )
    }

    fn desk() -> Coordinator {
        Coordinator::new("desk1", "Desk One", Role::Coordinator, "tok-1")
    }

    fn signup(user_id: &str, college: &str) -> NewRegistration {
        NewRegistration {
            user_id: user_id.into(),
            name: format!("Student {user_id}"),
            email: format!("{}@example.com", user_id.to_lowercase()),
            phone: "9000000000".into(),
            college: college.into(),
            user_type: UserType::Participant,
            participation_type: ParticipationType::Cultural,
            ..Default::default()
        }
    }

    fn cash(amount: rust_decimal::Decimal) -> PaymentRequest {
        PaymentRequest {
            amount: Amount::new(amount).unwrap(),
            method: PaymentMethod::Cash,
            notes: None,
            transaction_id: None,
        }
    }

    #[tokio::test]
    async fn test_register_assigns_sequential_ids() {
        let service = service();
        let first = service.register(signup("MH001", "JNTU")).await.unwrap();
        let second = service.register(signup("MH002", "JNTU")).await.unwrap();

        assert!(first.register_id.as_str().ends_with("000001"));
        assert!(second.register_id.as_str().ends_with("000002"));
        assert_eq!(first.payment.status, PaymentStatus::Unpaid);
        assert_eq!(first.payment.amount_due, Amount::rupees(200));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_user() {
        let service = service();
        service.register(signup("MH001", "JNTU")).await.unwrap();
        let dup = service.register(signup("mh001", "JNTU")).await;
        assert!(matches!(dup, Err(RegistryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_partial_then_full_payment() {
        let service = service();
        service.register(signup("MH001", "JNTU")).await.unwrap();

        let after_first = service
            .process_payment("MH001", &desk(), cash(dec!(120)))
            .await
            .unwrap();
        assert_eq!(after_first.payment.status, PaymentStatus::Pending);
        assert_eq!(after_first.payment.remaining(), Amount::rupees(80));

        let after_second = service
            .process_payment("mh001", &desk(), cash(dec!(80)))
            .await
            .unwrap();
        assert_eq!(after_second.payment.status, PaymentStatus::Paid);
        assert_eq!(after_second.payment.processed_by, Some(desk().id));

        let stored = service.find("MH001").await.unwrap();
        assert_eq!(stored.payment.paid, Amount::rupees(200));
    }

    #[tokio::test]
    async fn test_discounted_college_fee() {
        let service = service();
        let reg = service
            .register(signup("MH001", "Vignan's Lara Institute of Technology"))
            .await
            .unwrap();
        assert_eq!(reg.payment.amount_due, Amount::rupees(150));

        let paid = service
            .process_payment("MH001", &desk(), cash(dec!(150)))
            .await
            .unwrap();
        assert_eq!(paid.payment.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_concurrent_payments_are_not_lost() {
        let service = std::sync::Arc::new(service());
        service.register(signup("MH001", "JNTU")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .process_payment("MH001", &desk(), cash(dec!(10)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let reg = service.find("MH001").await.unwrap();
        assert_eq!(reg.payment.paid, Amount::rupees(100));
        assert_eq!(reg.payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_recomputes_fee() {
        let service = service();
        service.register(signup("MH001", "JNTU")).await.unwrap();
        let updated = service
            .update(
                "MH001",
                RegistrationUpdate {
                    college: Some("VFSTR".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.payment.amount_due, Amount::rupees(150));
    }

    #[tokio::test]
    async fn test_unpaid_excludes_paid() {
        let service = service();
        service.register(signup("MH001", "JNTU")).await.unwrap();
        service.register(signup("MH002", "JNTU")).await.unwrap();
        service
            .mark_paid("MH001", &desk(), MarkPaidRequest::default())
            .await
            .unwrap();

        let unpaid = service.unpaid(None).await.unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].user_id, "MH002");
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let service = service();
        service.register(signup("MH001", "JNTU")).await.unwrap();
        service
            .process_payment("MH001", &desk(), cash(dec!(50)))
            .await
            .unwrap();

        let reset = service.reset_payment("MH001", &desk()).await.unwrap();
        assert_eq!(reset.payment.status, PaymentStatus::Unpaid);
        assert_eq!(reset.payment.paid, Amount::ZERO);

        service.delete("MH001").await.unwrap();
        assert!(matches!(
            service.find("MH001").await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let service = service();
        for i in 1..=5 {
            service.register(signup(&format!("MH00{i}"), "JNTU")).await.unwrap();
        }
        service
            .mark_paid("MH003", &desk(), MarkPaidRequest::default())
            .await
            .unwrap();

        let (paid, page) = service
            .list(RegistrationQuery {
                status: Some(PaymentStatus::Paid),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(page.total, 1);

        let (second_page, page) = service
            .list(RegistrationQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second_page.len(), 2);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current, 2);

        let (found, _) = service
            .list(RegistrationQuery {
                search: Some("student mh004".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_pagination_bounds() {
        let (items, page) = Pagination::paginate(vec![1, 2, 3], Some(0), Some(0));
        assert_eq!(items, vec![1]);
        assert_eq!(page.current, 1);
        assert_eq!(page.pages, 3);

        let (items, page) = Pagination::paginate(Vec::<u8>::new(), None, None);
        assert!(items.is_empty());
        assert_eq!(page.pages, 0);

        let (items, page) = Pagination::paginate(vec![1, 2, 3], Some(usize::MAX), Some(2));
        assert!(items.is_empty());
        assert_eq!(page.current, usize::MAX);
        assert_eq!(page.pages, 2);

        let (items, _) = Pagination::paginate(vec![1, 2, 3], Some(usize::MAX), Some(usize::MAX));
        assert!(items.is_empty());
    }
}

//! Cross-engine workflow tests
//!
//! Wires the catalog, enrollment, claims, and scheduling engines over the
//! in-memory adapters and walks complete policy-holder journeys through
//! them.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::audit::mock::MemoryAuditLog;
use core_kernel::notify::mock::MemoryNotifier;
use core_kernel::{Actor, AuditAction, AuditRecorder, EntityType};
use domain_catalog::ports::mock::MemoryCatalog;
use domain_catalog::{CatalogService, PolicyProduct, PolicyTier};
use domain_claims::ports::mock::{MemoryClaimStore, MemoryFinanceRecordStore};
use domain_claims::{ClaimStatus, ClaimsService, FinanceDecision};
use domain_enrollment::ports::mock::{
    MemoryEnrollmentStore, MockCertificateService, MockPaymentGateway,
};
use domain_enrollment::{
    ActivationMode, EnrollmentConfig, EnrollmentService, EnrollmentStatus,
};
use domain_scheduling::ports::mock::{MemoryAppointmentStore, MemoryDoctorRegistry};
use domain_scheduling::{
    AppointmentStatus, Doctor, SchedulerConfig, SchedulingError, SchedulingService,
};
use test_utils::{
    assert_audited, assert_trail_chronological, init_tracing, ActorFixtures,
    AppointmentRequestBuilder, ClaimRequestBuilder, DoctorFixtures, ProductFixtures,
};

/// Everything wired together, the way a composition root would
struct System {
    catalog_service: CatalogService,
    enrollment_service: EnrollmentService,
    claims_service: ClaimsService,
    scheduling_service: SchedulingService,
    audit: Arc<MemoryAuditLog>,
    notifier: Arc<MemoryNotifier>,
    payments: Arc<MockPaymentGateway>,
    enrollments: Arc<MemoryEnrollmentStore>,
}

async fn system(activation: ActivationMode) -> System {
    init_tracing();

    let catalog = Arc::new(MemoryCatalog::new());
    let enrollments = Arc::new(MemoryEnrollmentStore::new());
    let claims = Arc::new(MemoryClaimStore::new());
    let finance_records = Arc::new(MemoryFinanceRecordStore::new());
    let appointments = Arc::new(MemoryAppointmentStore::new());
    let doctors = Arc::new(MemoryDoctorRegistry::new());
    let payments = Arc::new(MockPaymentGateway::new());
    let certificates = Arc::new(MockCertificateService::new());
    let audit = Arc::new(MemoryAuditLog::new());
    let notifier = Arc::new(MemoryNotifier::new());

    System {
        catalog_service: CatalogService::new(catalog.clone(), audit.clone()),
        enrollment_service: EnrollmentService::new(
            enrollments.clone(),
            catalog.clone(),
            payments.clone(),
            certificates,
            audit.clone(),
            notifier.clone(),
            EnrollmentConfig::new(activation),
        ),
        claims_service: ClaimsService::new(
            claims,
            finance_records,
            enrollments.clone(),
            catalog.clone(),
            audit.clone(),
            notifier.clone(),
        ),
        scheduling_service: SchedulingService::new(
            appointments,
            doctors,
            enrollments.clone(),
            catalog,
            audit.clone(),
            notifier.clone(),
            SchedulerConfig::default(),
        ),
        audit,
        notifier,
        payments,
        enrollments,
    }
}

async fn seeded_product(system: &System, product: PolicyProduct) -> PolicyProduct {
    // Catalog writes go through the staff service so the trail is complete
    system
        .catalog_service
        .create_product(
            domain_catalog::ProductDraft {
                name: product.name.clone(),
                tier: product.tier,
                coverage_amount: product.coverage_amount,
                premium_amount: product.premium_amount,
                duration_months: product.duration_months,
                description: product.description.clone(),
            },
            &ActorFixtures::policy_manager(),
        )
        .await
        .unwrap()
}

async fn seeded_doctor(system: &System) -> (Doctor, Actor) {
    let (doctor, actor) = DoctorFixtures::cardiologist();
    system
        .scheduling_service
        .register_doctor(&doctor)
        .await
        .unwrap();
    (doctor, actor)
}

#[tokio::test]
async fn full_policy_holder_journey() {
    let system = system(ActivationMode::DualApproval).await;
    let product = seeded_product(&system, ProductFixtures::premium_health()).await;
    let (doctor, doctor_actor) = seeded_doctor(&system).await;

    let holder = ActorFixtures::policy_holder();
    let pm = ActorFixtures::policy_manager();
    let fo = ActorFixtures::finance_officer();
    let cm = ActorFixtures::claims_manager();

    // Purchase: payment clears, enrollment parks at the approval gate
    let enrollment = system
        .enrollment_service
        .enroll(&holder, product.id)
        .await
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::PendingApproval);
    assert_eq!(system.payments.charges().await.len(), 1);

    // Dual approval activates on the second sign-off
    system
        .enrollment_service
        .approve_by_policy_manager(enrollment.id, &pm)
        .await
        .unwrap();
    let active = system
        .enrollment_service
        .approve_by_finance_officer(enrollment.id, &fo)
        .await
        .unwrap();
    assert_eq!(active.status, EnrollmentStatus::Active);

    // Claim: submit -> review -> forward -> settle
    let claim = system
        .claims_service
        .submit_claim(
            enrollment.id,
            ClaimRequestBuilder::for_product(product.id)
                .with_amount(dec!(30000))
                .with_diagnosis("appendicitis")
                .build(),
            &holder,
        )
        .await
        .unwrap();
    system
        .claims_service
        .review(claim.id, ClaimStatus::UnderReview, None, &cm)
        .await
        .unwrap();
    system
        .claims_service
        .review(
            claim.id,
            ClaimStatus::ApprovedByClaims,
            Some("verified".into()),
            &cm,
        )
        .await
        .unwrap();
    system
        .claims_service
        .forward_to_finance(claim.id, None, &cm)
        .await
        .unwrap();
    let (settled, _) = system
        .claims_service
        .settle(
            claim.id,
            FinanceDecision::Approved,
            None,
            Some(dec!(30000)),
            &fo,
        )
        .await
        .unwrap();
    assert_eq!(settled.status, ClaimStatus::ApprovedByFinance);
    assert_eq!(
        system
            .claims_service
            .coverage_used(enrollment.id)
            .await
            .unwrap(),
        dec!(30)
    );

    // Appointment: book -> accept -> complete
    let appointment = system
        .scheduling_service
        .book(
            enrollment.id,
            AppointmentRequestBuilder::with_doctor(doctor.id).build(),
            &holder,
        )
        .await
        .unwrap();
    system
        .scheduling_service
        .accept(appointment.id, doctor.id, &doctor_actor)
        .await
        .unwrap();
    let done = system
        .scheduling_service
        .update_status(appointment.id, AppointmentStatus::Completed, &doctor_actor)
        .await
        .unwrap();
    assert_eq!(done.status, AppointmentStatus::Completed);

    // Every transition left a trail, in order
    let enrollment_trail = system
        .audit
        .entries_for(EntityType::Enrollment, &enrollment.id.to_string())
        .await
        .unwrap();
    assert_audited(&enrollment_trail, AuditAction::Create, &product.name);
    assert_audited(&enrollment_trail, AuditAction::Approve, "Policy Manager");
    assert_audited(&enrollment_trail, AuditAction::Approve, "Finance Officer");
    assert_trail_chronological(&enrollment_trail);

    let claim_trail = system
        .audit
        .entries_for(EntityType::Claim, &claim.id.to_string())
        .await
        .unwrap();
    assert_audited(&claim_trail, AuditAction::Forward, "forwarded to finance");

    // The holder heard about activation and settlement
    let messages = system.notifier.sent_to(holder.user_id).await;
    assert!(messages.iter().any(|m| m.contains("now active")));
    assert!(messages.iter().any(|m| m.contains("approved and settled")));
}

#[tokio::test]
async fn coverage_consumption_caps_at_full_policy() {
    let system = system(ActivationMode::ImmediateOnPayment).await;
    let product = seeded_product(&system, ProductFixtures::premium_health()).await;
    let holder = ActorFixtures::policy_holder();
    let cm = ActorFixtures::claims_manager();
    let fo = ActorFixtures::finance_officer();

    let enrollment = system
        .enrollment_service
        .enroll(&holder, product.id)
        .await
        .unwrap();

    // 30k + 80k both settle against 100k of coverage
    for amount in [dec!(30000), dec!(80000)] {
        let claim = system
            .claims_service
            .submit_claim(
                enrollment.id,
                ClaimRequestBuilder::for_product(product.id)
                    .with_amount(amount)
                    .build(),
                &holder,
            )
            .await
            .unwrap();
        system
            .claims_service
            .review(claim.id, ClaimStatus::ApprovedByClaims, None, &cm)
            .await
            .unwrap();
        system
            .claims_service
            .forward_to_finance(claim.id, None, &cm)
            .await
            .unwrap();
        system
            .claims_service
            .settle(claim.id, FinanceDecision::Approved, None, Some(amount), &fo)
            .await
            .unwrap();
    }

    assert_eq!(
        system
            .claims_service
            .coverage_used(enrollment.id)
            .await
            .unwrap(),
        dec!(100)
    );
}

#[tokio::test]
async fn two_holders_racing_for_one_slot_yields_one_booking() {
    let system = system(ActivationMode::ImmediateOnPayment).await;
    let product = seeded_product(&system, ProductFixtures::premium_health()).await;
    let (doctor, _) = seeded_doctor(&system).await;

    let first = ActorFixtures::random_holder();
    let second = ActorFixtures::random_holder();
    let first_enrollment = system
        .enrollment_service
        .enroll(&first, product.id)
        .await
        .unwrap();
    let second_enrollment = system
        .enrollment_service
        .enroll(&second, product.id)
        .await
        .unwrap();

    let request = AppointmentRequestBuilder::with_doctor(doctor.id);
    let date = chrono::Utc::now().date_naive() + chrono::Days::new(10);
    let time = chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    system
        .scheduling_service
        .book(
            first_enrollment.id,
            AppointmentRequestBuilder::with_doctor(doctor.id)
                .on(date, time)
                .build(),
            &first,
        )
        .await
        .unwrap();

    let err = system
        .scheduling_service
        .book(
            second_enrollment.id,
            request.on(date, time).build(),
            &second,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::SlotTaken { .. }));
}

#[tokio::test]
async fn upgrade_unlocks_the_appointment_tier() {
    let system = system(ActivationMode::ImmediateOnPayment).await;
    let basic = seeded_product(&system, ProductFixtures::basic_health()).await;
    let premium = seeded_product(&system, ProductFixtures::premium_health()).await;
    let (doctor, _) = seeded_doctor(&system).await;
    let holder = ActorFixtures::policy_holder();

    let enrollment = system
        .enrollment_service
        .enroll(&holder, basic.id)
        .await
        .unwrap();

    // Basic tier cannot book
    let err = system
        .scheduling_service
        .book(
            enrollment.id,
            AppointmentRequestBuilder::with_doctor(doctor.id).build(),
            &holder,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::TierNotEligible { .. }));

    // Upgrading to premium keeps the same enrollment and opens the gate
    let upgraded = system
        .enrollment_service
        .enroll(&holder, premium.id)
        .await
        .unwrap();
    assert_eq!(upgraded.id, enrollment.id);
    assert_eq!(upgraded.product_id, premium.id);

    let appointment = system
        .scheduling_service
        .book(
            enrollment.id,
            AppointmentRequestBuilder::with_doctor(doctor.id).build(),
            &holder,
        )
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn expiry_sweep_is_idempotent_across_engines() {
    let system = system(ActivationMode::ImmediateOnPayment).await;
    let product = seeded_product(&system, ProductFixtures::premium_health()).await;
    let holder = ActorFixtures::policy_holder();
    let pm = ActorFixtures::policy_manager();

    let mut enrollment = system
        .enrollment_service
        .enroll(&holder, product.id)
        .await
        .unwrap();

    // Nothing due yet
    assert!(system
        .enrollment_service
        .sweep_expired(&pm)
        .await
        .unwrap()
        .is_empty());

    // Run out the coverage term
    enrollment.end_date = chrono::Utc::now().date_naive() - chrono::Days::new(1);
    system.enrollments.insert(enrollment.clone()).await;

    let first = system.enrollment_service.sweep_expired(&pm).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].status, EnrollmentStatus::Expired);

    // The second run is a no-op for rows already expired
    assert!(system
        .enrollment_service
        .sweep_expired(&pm)
        .await
        .unwrap()
        .is_empty());

    let messages = system.notifier.sent_to(holder.user_id).await;
    assert!(messages.iter().any(|m| m.contains("expired")));
}

#[tokio::test]
async fn tier_gating_spans_senior_products_too() {
    let system = system(ActivationMode::ImmediateOnPayment).await;
    let senior = seeded_product(&system, ProductFixtures::senior_care()).await;
    let (doctor, _) = seeded_doctor(&system).await;
    let holder = ActorFixtures::policy_holder();

    let enrollment = system
        .enrollment_service
        .enroll(&holder, senior.id)
        .await
        .unwrap();

    let appointment = system
        .scheduling_service
        .book(
            enrollment.id,
            AppointmentRequestBuilder::with_doctor(doctor.id).build(),
            &holder,
        )
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(senior.tier, PolicyTier::Senior);
}

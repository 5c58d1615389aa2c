//! Appointment scheduling engine
//!
//! Booking, doctor responses, staff resolution, and holder edits. The
//! PREMIUM/SENIOR tier gate and the slot-collision invariant are enforced
//! here, once, at every mutating entry point.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use validator::Validate;

use core_kernel::{
    audit::record_or_warn, notify::notify_or_warn, Actor, AppointmentId, AuditAction, AuditEntry,
    AuditRecorder, Capability, DoctorId, EnrollmentId, EntityType, Notifier,
};
use domain_catalog::CatalogPort;
use domain_enrollment::{Enrollment, EnrollmentPort};

use crate::appointment::{Appointment, AppointmentStatus};
use crate::config::SchedulerConfig;
use crate::doctor::Doctor;
use crate::error::SchedulingError;
use crate::ports::{AppointmentPort, DoctorPort};
use crate::requests::BookAppointmentRequest;

/// The appointment scheduling engine
pub struct SchedulingService {
    appointments: Arc<dyn AppointmentPort>,
    doctors: Arc<dyn DoctorPort>,
    enrollments: Arc<dyn EnrollmentPort>,
    catalog: Arc<dyn CatalogPort>,
    audit: Arc<dyn AuditRecorder>,
    notifier: Arc<dyn Notifier>,
    config: SchedulerConfig,
}

impl SchedulingService {
    pub fn new(
        appointments: Arc<dyn AppointmentPort>,
        doctors: Arc<dyn DoctorPort>,
        enrollments: Arc<dyn EnrollmentPort>,
        catalog: Arc<dyn CatalogPort>,
        audit: Arc<dyn AuditRecorder>,
        notifier: Arc<dyn Notifier>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            appointments,
            doctors,
            enrollments,
            catalog,
            audit,
            notifier,
            config,
        }
    }

    /// Books an appointment for the acting holder
    ///
    /// # Errors
    ///
    /// - [`SchedulingError::TierNotEligible`] unless the enrollment's
    ///   product is PREMIUM or SENIOR
    /// - [`SchedulingError::DoctorUnavailable`] when the doctor is not
    ///   accepting bookings
    /// - [`SchedulingError::SlotTaken`] when another non-terminal
    ///   appointment holds the same (doctor, date, time)
    pub async fn book(
        &self,
        enrollment_id: EnrollmentId,
        request: BookAppointmentRequest,
        actor: &Actor,
    ) -> Result<Appointment, SchedulingError> {
        actor.require(Capability::BookAppointments)?;
        request
            .validate()
            .map_err(|e| SchedulingError::Validation(e.to_string()))?;

        let enrollment = self.owned_enrollment(enrollment_id, actor).await?;
        self.require_appointment_tier(&enrollment).await?;

        let doctor = self.doctors.get(request.doctor_id).await?;
        if !doctor.available {
            return Err(SchedulingError::DoctorUnavailable);
        }
        self.ensure_slot_free(doctor.id, request.date, request.time, None)
            .await?;

        let mut appointment = Appointment::book(
            enrollment.id,
            doctor.id,
            request.date,
            request.time,
            request.reason,
            request.notes,
        );
        appointment.version = self
            .appointments
            .save(&appointment, appointment.version)
            .await?;

        tracing::info!(
            appointment_id = %appointment.id,
            doctor = %doctor.name,
            date = %appointment.date,
            "appointment booked"
        );
        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Create,
                &actor.name,
                format!(
                    "Appointment booked with Dr. {} on {} at {}",
                    doctor.name, appointment.date, appointment.time
                ),
            ),
        )
        .await;
        notify_or_warn(
            self.notifier.as_ref(),
            doctor.user_id,
            "A new appointment request is awaiting your response",
        )
        .await;

        Ok(appointment)
    }

    /// Doctor accepts a pending appointment
    pub async fn accept(
        &self,
        appointment_id: AppointmentId,
        doctor_id: DoctorId,
        actor: &Actor,
    ) -> Result<Appointment, SchedulingError> {
        actor.require(Capability::RespondToAppointments)?;

        let mut appointment = self.appointments.get(appointment_id).await?;
        appointment.accept(doctor_id)?;
        appointment.version = self
            .appointments
            .save(&appointment, appointment.version)
            .await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Approve,
                &actor.name,
                format!("Appointment accepted for {}", appointment.date),
            ),
        )
        .await;
        self.notify_holder(&appointment, "Your appointment has been scheduled")
            .await;

        Ok(appointment)
    }

    /// Doctor declines a pending or scheduled appointment
    pub async fn reject(
        &self,
        appointment_id: AppointmentId,
        doctor_id: DoctorId,
        reason: &str,
        actor: &Actor,
    ) -> Result<Appointment, SchedulingError> {
        actor.require(Capability::RespondToAppointments)?;

        let mut appointment = self.appointments.get(appointment_id).await?;
        appointment.reject(doctor_id, reason)?;
        appointment.version = self
            .appointments
            .save(&appointment, appointment.version)
            .await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Reject,
                &actor.name,
                format!("Appointment rejected. Reason: {reason}"),
            ),
        )
        .await;
        self.notify_holder(
            &appointment,
            &format!("Your appointment was declined: {reason}"),
        )
        .await;

        Ok(appointment)
    }

    /// Staff/doctor resolution: confirm, complete, cancel, or no-show
    pub async fn update_status(
        &self,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
        actor: &Actor,
    ) -> Result<Appointment, SchedulingError> {
        actor.require(Capability::ResolveAppointments)?;

        let mut appointment = self.appointments.get(appointment_id).await?;
        appointment.update_status(status)?;
        appointment.version = self
            .appointments
            .save(&appointment, appointment.version)
            .await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Update,
                &actor.name,
                format!("Appointment status updated to: {status}"),
            ),
        )
        .await;

        Ok(appointment)
    }

    /// Holder reschedules an unresolved appointment
    ///
    /// The appointment returns to `Pending` and re-enters the doctor's
    /// queue; the slot invariant is re-checked for the new slot.
    pub async fn edit(
        &self,
        appointment_id: AppointmentId,
        enrollment_id: EnrollmentId,
        request: BookAppointmentRequest,
        actor: &Actor,
    ) -> Result<Appointment, SchedulingError> {
        actor.require(Capability::BookAppointments)?;
        request
            .validate()
            .map_err(|e| SchedulingError::Validation(e.to_string()))?;

        let enrollment = self.owned_enrollment(enrollment_id, actor).await?;
        self.require_appointment_tier(&enrollment).await?;

        let mut appointment = self.appointments.get(appointment_id).await?;
        if appointment.enrollment_id != enrollment.id {
            return Err(SchedulingError::NotOwner);
        }
        if !appointment.is_editable() {
            return Err(SchedulingError::NotEditable {
                current: appointment.status,
            });
        }

        let doctor = self.doctors.get(request.doctor_id).await?;
        if !doctor.available {
            return Err(SchedulingError::DoctorUnavailable);
        }
        self.ensure_slot_free(doctor.id, request.date, request.time, Some(appointment.id))
            .await?;

        appointment.edit(
            doctor.id,
            request.date,
            request.time,
            request.reason,
            request.notes,
        )?;
        appointment.version = self
            .appointments
            .save(&appointment, appointment.version)
            .await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Update,
                &actor.name,
                format!(
                    "Appointment rescheduled to {} at {} with Dr. {}",
                    appointment.date, appointment.time, doctor.name
                ),
            ),
        )
        .await;
        notify_or_warn(
            self.notifier.as_ref(),
            doctor.user_id,
            "A rescheduled appointment request is awaiting your response",
        )
        .await;

        Ok(appointment)
    }

    /// Holder withdraws an unresolved appointment; hard delete
    pub async fn delete(
        &self,
        appointment_id: AppointmentId,
        enrollment_id: EnrollmentId,
        actor: &Actor,
    ) -> Result<(), SchedulingError> {
        actor.require(Capability::BookAppointments)?;

        let enrollment = self.owned_enrollment(enrollment_id, actor).await?;
        self.require_appointment_tier(&enrollment).await?;

        let appointment = self.appointments.get(appointment_id).await?;
        if appointment.enrollment_id != enrollment.id {
            return Err(SchedulingError::NotOwner);
        }
        if !appointment.is_editable() {
            return Err(SchedulingError::NotEditable {
                current: appointment.status,
            });
        }

        self.appointments.delete(appointment.id).await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Appointment,
                appointment.id,
                AuditAction::Delete,
                &actor.name,
                format!(
                    "Appointment on {} at {} deleted by holder",
                    appointment.date, appointment.time
                ),
            ),
        )
        .await;

        Ok(())
    }

    /// All appointments booked under one enrollment
    pub async fn appointments_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.appointments.find_by_enrollment(enrollment_id).await?)
    }

    /// A doctor's schedule for one day
    pub async fn schedule_for(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self
            .appointments
            .find_by_doctor_and_date(doctor_id, date)
            .await?)
    }

    /// Registers a doctor in the scheduling registry
    pub async fn register_doctor(&self, doctor: &Doctor) -> Result<(), SchedulingError> {
        Ok(self.doctors.save(doctor).await?)
    }

    /// Loads the enrollment and checks the acting holder owns it
    async fn owned_enrollment(
        &self,
        enrollment_id: EnrollmentId,
        actor: &Actor,
    ) -> Result<Enrollment, SchedulingError> {
        let enrollment = self.enrollments.get(enrollment_id).await?;
        if enrollment.user_id != actor.user_id {
            return Err(SchedulingError::NotOwner);
        }
        Ok(enrollment)
    }

    /// The PREMIUM/SENIOR feature gate
    async fn require_appointment_tier(
        &self,
        enrollment: &Enrollment,
    ) -> Result<(), SchedulingError> {
        let product = self.catalog.get_product(enrollment.product_id).await?;
        if !product.tier.supports_appointments() {
            return Err(SchedulingError::TierNotEligible { tier: product.tier });
        }
        Ok(())
    }

    /// Rejects the slot when a non-terminal appointment already holds it
    async fn ensure_slot_free(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<AppointmentId>,
    ) -> Result<(), SchedulingError> {
        if !self.config.enforce_slot_check {
            return Ok(());
        }

        let existing = self
            .appointments
            .find_by_doctor_and_date(doctor_id, date)
            .await?;
        let taken = existing.iter().any(|a| {
            a.time == time && a.occupies_slot() && Some(a.id) != exclude
        });
        if taken {
            return Err(SchedulingError::SlotTaken { date, time });
        }
        Ok(())
    }

    async fn notify_holder(&self, appointment: &Appointment, message: &str) {
        match self.enrollments.get(appointment.enrollment_id).await {
            Ok(enrollment) => {
                notify_or_warn(self.notifier.as_ref(), enrollment.user_id, message).await;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    appointment_id = %appointment.id,
                    "holder lookup failed"
                );
            }
        }
    }
}

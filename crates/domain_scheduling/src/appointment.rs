//! Appointment aggregate

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AppointmentId, DoctorId, EnrollmentId};

use crate::error::SchedulingError;

/// Appointment lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// Booked by the holder, awaiting the doctor's response
    Pending,
    /// Accepted by the doctor
    Scheduled,
    /// Confirmed closer to the date
    Confirmed,
    Completed,
    Cancelled,
    /// Declined by the doctor
    Rejected,
    NoShow,
}

impl AppointmentStatus {
    /// Terminal appointments release their slot
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed
                | AppointmentStatus::Cancelled
                | AppointmentStatus::Rejected
                | AppointmentStatus::NoShow
        )
    }

    /// The legal-transition table for appointments
    pub fn can_transition_to(self, target: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Scheduled)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Scheduled, Confirmed)
                | (Scheduled, Completed)
                | (Scheduled, Cancelled)
                | (Scheduled, Rejected)
                | (Scheduled, NoShow)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Rejected => "REJECTED",
            AppointmentStatus::NoShow => "NO_SHOW",
        };
        write!(f, "{name}")
    }
}

/// A clinical appointment between a policy holder and a doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub enrollment_id: EnrollmentId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: Option<String>,
    /// Set when the doctor rejects; visible to the holder
    pub rejection_reason: Option<String>,
    /// Optimistic-concurrency counter, bumped by the store on save
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Books a new appointment awaiting the doctor's response
    pub fn book(
        enrollment_id: EnrollmentId,
        doctor_id: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
        reason: String,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AppointmentId::new_v7(),
            enrollment_id,
            doctor_id,
            date,
            time,
            status: AppointmentStatus::Pending,
            reason,
            notes,
            rejection_reason: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the appointment still occupies its doctor's slot
    pub fn occupies_slot(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Holder edits and deletes are only allowed before resolution
    pub fn is_editable(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Scheduled
        )
    }

    /// Doctor accepts a pending appointment
    ///
    /// # Errors
    ///
    /// Fails when `doctor_id` is not the assigned doctor, or the
    /// appointment is not awaiting a response.
    pub fn accept(&mut self, doctor_id: DoctorId) -> Result<(), SchedulingError> {
        if self.doctor_id != doctor_id {
            return Err(SchedulingError::NotAuthorized);
        }
        if self.status != AppointmentStatus::Pending {
            return Err(SchedulingError::InvalidState {
                current: self.status,
            });
        }

        self.status = AppointmentStatus::Scheduled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Doctor declines a pending or already-scheduled appointment
    pub fn reject(&mut self, doctor_id: DoctorId, reason: &str) -> Result<(), SchedulingError> {
        if self.doctor_id != doctor_id {
            return Err(SchedulingError::NotAuthorized);
        }
        if !matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Scheduled
        ) {
            return Err(SchedulingError::InvalidState {
                current: self.status,
            });
        }

        self.status = AppointmentStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Staff/doctor resolution (confirm, complete, cancel, no-show)
    ///
    /// Guarded by the legal-transition table like every other status write.
    pub fn update_status(&mut self, target: AppointmentStatus) -> Result<(), SchedulingError> {
        if !self.status.can_transition_to(target) {
            return Err(SchedulingError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Holder reschedules; the appointment goes back to the doctor's queue
    pub fn edit(
        &mut self,
        doctor_id: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
        reason: String,
        notes: Option<String>,
    ) -> Result<(), SchedulingError> {
        if !self.is_editable() {
            return Err(SchedulingError::NotEditable {
                current: self.status,
            });
        }

        self.doctor_id = doctor_id;
        self.date = date;
        self.time = time;
        self.reason = reason;
        self.notes = notes;
        self.status = AppointmentStatus::Pending;
        self.rejection_reason = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment() -> Appointment {
        Appointment::book(
            EnrollmentId::new_v7(),
            DoctorId::new_v7(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "annual check-up".into(),
            None,
        )
    }

    #[test]
    fn test_booking_starts_pending() {
        let appointment = appointment();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert!(appointment.occupies_slot());
        assert!(appointment.is_editable());
    }

    #[test]
    fn test_accept_moves_to_scheduled() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.accept(doctor).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_accept_by_wrong_doctor_fails() {
        let mut appointment = appointment();
        assert!(matches!(
            appointment.accept(DoctorId::new_v7()),
            Err(SchedulingError::NotAuthorized)
        ));
    }

    #[test]
    fn test_accept_twice_fails() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.accept(doctor).unwrap();
        assert!(matches!(
            appointment.accept(doctor),
            Err(SchedulingError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_reject_stores_reason_and_releases_slot() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.reject(doctor, "unavailable").unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Rejected);
        assert_eq!(appointment.rejection_reason.as_deref(), Some("unavailable"));
        assert!(!appointment.occupies_slot());
    }

    #[test]
    fn test_reject_works_after_accept() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.accept(doctor).unwrap();
        appointment.reject(doctor, "emergency came up").unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Rejected);
    }

    #[test]
    fn test_reject_terminal_appointment_fails() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.reject(doctor, "unavailable").unwrap();
        assert!(matches!(
            appointment.reject(doctor, "again"),
            Err(SchedulingError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_update_status_follows_table() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.accept(doctor).unwrap();
        appointment
            .update_status(AppointmentStatus::Confirmed)
            .unwrap();
        appointment
            .update_status(AppointmentStatus::Completed)
            .unwrap();
        assert!(appointment.status.is_terminal());
    }

    #[test]
    fn test_update_status_rejects_illegal_move() {
        let mut appointment = appointment();
        // Pending cannot jump straight to Completed
        assert!(matches!(
            appointment.update_status(AppointmentStatus::Completed),
            Err(SchedulingError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_edit_resets_to_pending() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.accept(doctor).unwrap();

        appointment
            .edit(
                doctor,
                NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
                NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                "follow-up".into(),
                Some("bring reports".into()),
            )
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.reason, "follow-up");
        assert!(appointment.rejection_reason.is_none());
    }

    #[test]
    fn test_edit_resolved_appointment_fails() {
        let mut appointment = appointment();
        let doctor = appointment.doctor_id;
        appointment.reject(doctor, "unavailable").unwrap();

        assert!(matches!(
            appointment.edit(
                doctor,
                appointment.date,
                appointment.time,
                "retry".into(),
                None,
            ),
            Err(SchedulingError::NotEditable { .. })
        ));
    }
}

//! Scheduling domain ports

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{AppointmentId, DoctorId, DomainPort, EnrollmentId, PortError};

use crate::appointment::{Appointment, AppointmentStatus};
use crate::doctor::Doctor;

/// Port for the appointment store
#[async_trait]
pub trait AppointmentPort: DomainPort {
    /// Retrieves an appointment by id, or `PortError::NotFound`
    async fn get(&self, id: AppointmentId) -> Result<Appointment, PortError>;

    /// A doctor's appointments on one date, for slot-collision checks
    async fn find_by_doctor_and_date(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, PortError>;

    /// All appointments booked under one enrollment
    async fn find_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Appointment>, PortError>;

    /// All appointments currently in `status`
    async fn find_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, PortError>;

    /// Conditional upsert; `PortError::Conflict` on a stale version
    async fn save(
        &self,
        appointment: &Appointment,
        expected_version: u32,
    ) -> Result<u32, PortError>;

    /// Hard delete
    async fn delete(&self, id: AppointmentId) -> Result<(), PortError>;
}

/// Port for the doctor registry
#[async_trait]
pub trait DoctorPort: DomainPort {
    async fn get(&self, id: DoctorId) -> Result<Doctor, PortError>;

    async fn save(&self, doctor: &Doctor) -> Result<(), PortError>;
}

/// In-memory adapters for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory appointment store with compare-and-swap saves
    #[derive(Debug, Default, Clone)]
    pub struct MemoryAppointmentStore {
        appointments: Arc<RwLock<HashMap<AppointmentId, Appointment>>>,
    }

    impl MemoryAppointmentStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds the store, bypassing the version check
        pub async fn insert(&self, appointment: Appointment) {
            self.appointments
                .write()
                .await
                .insert(appointment.id, appointment);
        }

        pub async fn contains(&self, id: AppointmentId) -> bool {
            self.appointments.read().await.contains_key(&id)
        }
    }

    impl DomainPort for MemoryAppointmentStore {}

    #[async_trait]
    impl AppointmentPort for MemoryAppointmentStore {
        async fn get(&self, id: AppointmentId) -> Result<Appointment, PortError> {
            self.appointments
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Appointment", id))
        }

        async fn find_by_doctor_and_date(
            &self,
            doctor_id: DoctorId,
            date: NaiveDate,
        ) -> Result<Vec<Appointment>, PortError> {
            Ok(self
                .appointments
                .read()
                .await
                .values()
                .filter(|a| a.doctor_id == doctor_id && a.date == date)
                .cloned()
                .collect())
        }

        async fn find_by_enrollment(
            &self,
            enrollment_id: EnrollmentId,
        ) -> Result<Vec<Appointment>, PortError> {
            Ok(self
                .appointments
                .read()
                .await
                .values()
                .filter(|a| a.enrollment_id == enrollment_id)
                .cloned()
                .collect())
        }

        async fn find_by_status(
            &self,
            status: AppointmentStatus,
        ) -> Result<Vec<Appointment>, PortError> {
            Ok(self
                .appointments
                .read()
                .await
                .values()
                .filter(|a| a.status == status)
                .cloned()
                .collect())
        }

        async fn save(
            &self,
            appointment: &Appointment,
            expected_version: u32,
        ) -> Result<u32, PortError> {
            let mut appointments = self.appointments.write().await;
            if let Some(existing) = appointments.get(&appointment.id) {
                if existing.version != expected_version {
                    return Err(PortError::stale_version("Appointment", appointment.id));
                }
            } else if expected_version != 0 {
                return Err(PortError::stale_version("Appointment", appointment.id));
            }

            let new_version = expected_version + 1;
            let mut stored = appointment.clone();
            stored.version = new_version;
            appointments.insert(stored.id, stored);
            Ok(new_version)
        }

        async fn delete(&self, id: AppointmentId) -> Result<(), PortError> {
            self.appointments
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Appointment", id))
        }
    }

    /// In-memory doctor registry
    #[derive(Debug, Default, Clone)]
    pub struct MemoryDoctorRegistry {
        doctors: Arc<RwLock<HashMap<DoctorId, Doctor>>>,
    }

    impl MemoryDoctorRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_doctors(doctors: Vec<Doctor>) -> Self {
            let registry = Self::new();
            for doctor in doctors {
                registry.doctors.write().await.insert(doctor.id, doctor);
            }
            registry
        }
    }

    impl DomainPort for MemoryDoctorRegistry {}

    #[async_trait]
    impl DoctorPort for MemoryDoctorRegistry {
        async fn get(&self, id: DoctorId) -> Result<Doctor, PortError> {
            self.doctors
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Doctor", id))
        }

        async fn save(&self, doctor: &Doctor) -> Result<(), PortError> {
            self.doctors.write().await.insert(doctor.id, doctor.clone());
            Ok(())
        }
    }
}

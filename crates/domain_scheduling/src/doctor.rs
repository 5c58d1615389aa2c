//! Doctor reference data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DoctorId, UserId};

/// A doctor available for clinical appointments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    /// Account behind the doctor, for notifications
    pub user_id: UserId,
    pub name: String,
    pub specialization: String,
    pub registration_no: String,
    /// Unavailable doctors accept no new bookings
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        specialization: impl Into<String>,
        registration_no: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DoctorId::new_v7(),
            user_id,
            name: name.into(),
            specialization: specialization.into(),
            registration_no: registration_no.into(),
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
        self.updated_at = Utc::now();
    }
}

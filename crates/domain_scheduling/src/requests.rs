//! Appointment request payloads

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::DoctorId;

/// Payload for booking or rescheduling an appointment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookAppointmentRequest {
    pub doctor_id: DoctorId,
    #[validate(custom(function = "not_in_past"))]
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

fn not_in_past(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= chrono::Utc::now().date_naive() {
        Ok(())
    } else {
        let mut error = ValidationError::new("date");
        error.message = Some("appointment date cannot be in the past".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookAppointmentRequest {
        BookAppointmentRequest {
            doctor_id: DoctorId::new(),
            date: chrono::Utc::now().date_naive() + chrono::Days::new(7),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            reason: "annual check-up".into(),
            notes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_past_date_rejected() {
        let mut r = request();
        r.date = chrono::Utc::now().date_naive() - chrono::Days::new(1);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_blank_reason_rejected() {
        let mut r = request();
        r.reason = String::new();
        assert!(r.validate().is_err());
    }
}

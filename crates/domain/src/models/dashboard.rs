//! Dashboard overview domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::application::ApplicationSummary;
use super::commission::CommissionSummary;
use super::payment::PaymentSummary;
use super::university::UniversitySummary;
use super::user::UserSummary;

/// Application conversion funnel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionFunnel {
    pub applications: usize,
    /// Offer received or already admitted.
    pub offers: usize,
    pub admissions: usize,
}

impl ConversionFunnel {
    /// Share of applications that reached admission, in percent.
    pub fn admission_rate(&self) -> f64 {
        if self.applications == 0 {
            0.0
        } else {
            self.admissions as f64 * 100.0 / self.applications as f64
        }
    }
}

/// Headline statistics across every resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_students: usize,
    pub total_applications: usize,
    pub total_universities: usize,
    pub active_universities: usize,
    /// Net of completed payments.
    pub total_revenue: f64,
    pub outstanding_commissions: f64,
    pub funnel: ConversionFunnel,
    pub generated_at: DateTime<Utc>,
}

impl DashboardOverview {
    pub fn from_summaries(
        users: &UserSummary,
        universities: &UniversitySummary,
        applications: &ApplicationSummary,
        commissions: &CommissionSummary,
        payments: &PaymentSummary,
    ) -> Self {
        Self {
            total_students: users.students,
            total_applications: applications.total,
            total_universities: universities.total,
            active_universities: universities.active,
            total_revenue: payments.total_amount,
            outstanding_commissions: commissions.outstanding_amount,
            funnel: ConversionFunnel {
                applications: applications.total,
                offers: applications.offer_received + applications.admitted,
                admissions: applications.admitted,
            },
            generated_at: Utc::now(),
        }
    }
}

use std::sync::Arc;

use domain::models::{
    Application, Appointment, Commission, Document, Payment, University, User,
};
use domain::services::{
    ApplicationGateway, AppointmentGateway, CommissionGateway, DocumentGateway, PaymentGateway,
    ResourceGateway,
};
use persistence::{FixtureError, FixtureGateway, FixtureSet, LatencyConfig};
use tracing::info;

use crate::config::Config;
use crate::controller::{
    ApplicationListController, AppointmentListController, CommissionListController,
    DocumentListController, PaymentListController, ResourceListController,
    UniversityListController, UserListController,
};
use crate::services::DashboardService;

/// Shared gateways and configuration for every list view.
///
/// Controllers created from the same state share one fixture store per
/// resource, so a mutation through one is visible to all of them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<FixtureGateway<User>>,
    pub universities: Arc<FixtureGateway<University>>,
    pub applications: Arc<FixtureGateway<Application>>,
    pub commissions: Arc<FixtureGateway<Commission>>,
    pub payments: Arc<FixtureGateway<Payment>>,
    pub documents: Arc<FixtureGateway<Document>>,
    pub appointments: Arc<FixtureGateway<Appointment>>,
}

/// Seeds the fixture stores and builds the shared state.
pub fn create_app(config: Config) -> Result<AppState, FixtureError> {
    let fixtures = FixtureSet::load()?
        .with_generated_students(config.fixtures.generated_students, config.fixtures.seed);
    Ok(AppState::from_fixtures(config, fixtures))
}

impl AppState {
    pub fn from_fixtures(config: Config, fixtures: FixtureSet) -> Self {
        let latency: LatencyConfig = config.latency_config();
        info!(
            users = fixtures.users.len(),
            universities = fixtures.universities.len(),
            applications = fixtures.applications.len(),
            commissions = fixtures.commissions.len(),
            payments = fixtures.payments.len(),
            documents = fixtures.documents.len(),
            appointments = fixtures.appointments.len(),
            latency_enabled = latency.enabled,
            "Seeded fixture stores"
        );

        Self {
            users: Arc::new(FixtureGateway::seeded(fixtures.users, latency.clone())),
            universities: Arc::new(FixtureGateway::seeded(
                fixtures.universities,
                latency.clone(),
            )),
            applications: Arc::new(FixtureGateway::seeded(
                fixtures.applications,
                latency.clone(),
            )),
            commissions: Arc::new(FixtureGateway::seeded(fixtures.commissions, latency.clone())),
            payments: Arc::new(FixtureGateway::seeded(fixtures.payments, latency.clone())),
            documents: Arc::new(FixtureGateway::seeded(fixtures.documents, latency.clone())),
            appointments: Arc::new(FixtureGateway::seeded(fixtures.appointments, latency)),
            config: Arc::new(config),
        }
    }

    pub fn user_list(&self) -> UserListController {
        let gateway: Arc<dyn ResourceGateway<User>> = self.users.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn university_list(&self) -> UniversityListController {
        let gateway: Arc<dyn ResourceGateway<University>> = self.universities.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn application_list(&self) -> ApplicationListController {
        let gateway: Arc<dyn ApplicationGateway> = self.applications.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn commission_list(&self) -> CommissionListController {
        let gateway: Arc<dyn CommissionGateway> = self.commissions.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn payment_list(&self) -> PaymentListController {
        let gateway: Arc<dyn PaymentGateway> = self.payments.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn document_list(&self) -> DocumentListController {
        let gateway: Arc<dyn DocumentGateway> = self.documents.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn appointment_list(&self) -> AppointmentListController {
        let gateway: Arc<dyn AppointmentGateway> = self.appointments.clone();
        ResourceListController::new(gateway, &self.config.pagination)
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(
            self.users.clone(),
            self.universities.clone(),
            self.applications.clone(),
            self.commissions.clone(),
            self.payments.clone(),
        )
    }
}

//! Commission gateway operations.

use domain::models::Commission;
use domain::services::CommissionGateway;

use super::fixture::FixtureGateway;

impl CommissionGateway for FixtureGateway<Commission> {}

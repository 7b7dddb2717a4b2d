//! Seed records for every resource.
//!
//! The built-in records are JSON files compiled into the crate. Additional
//! student accounts can be generated deterministically from a seed.

use chrono::{Datelike, Duration, NaiveDate};
use domain::models::{
    AccountStatus, Application, Appointment, Commission, Document, Payment, University, User,
    UserRole,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use thiserror::Error;

const USERS: &str = include_str!("../fixtures/users.json");
const UNIVERSITIES: &str = include_str!("../fixtures/universities.json");
const APPLICATIONS: &str = include_str!("../fixtures/applications.json");
const COMMISSIONS: &str = include_str!("../fixtures/commissions.json");
const PAYMENTS: &str = include_str!("../fixtures/payments.json");
const DOCUMENTS: &str = include_str!("../fixtures/documents.json");
const APPOINTMENTS: &str = include_str!("../fixtures/appointments.json");

const STUDENT_COUNTRIES: &[&str] = &[
    "India", "Nigeria", "Pakistan", "Vietnam", "Brazil", "Kenya", "Nepal", "Bangladesh",
];

/// Error type for fixture loading.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Invalid fixture file {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One collection of records per resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    pub users: Vec<User>,
    pub universities: Vec<University>,
    pub applications: Vec<Application>,
    pub commissions: Vec<Commission>,
    pub payments: Vec<Payment>,
    pub documents: Vec<Document>,
    pub appointments: Vec<Appointment>,
}

impl FixtureSet {
    /// Loads the built-in records.
    pub fn load() -> Result<Self, FixtureError> {
        Ok(Self {
            users: parse("users.json", USERS)?,
            universities: parse("universities.json", UNIVERSITIES)?,
            applications: parse("applications.json", APPLICATIONS)?,
            commissions: parse("commissions.json", COMMISSIONS)?,
            payments: parse("payments.json", PAYMENTS)?,
            documents: parse("documents.json", DOCUMENTS)?,
            appointments: parse("appointments.json", APPOINTMENTS)?,
        })
    }

    /// Appends `count` generated student accounts. The same `seed` always
    /// yields the same students.
    pub fn with_generated_students(mut self, count: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut next_id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

        for _ in 0..count {
            self.users.push(generate_student(&mut rng, next_id, epoch));
            next_id += 1;
        }
        self
    }
}

fn parse<T: DeserializeOwned>(file: &'static str, json: &str) -> Result<Vec<T>, FixtureError> {
    serde_json::from_str(json).map_err(|source| FixtureError::Parse { file, source })
}

fn generate_student(rng: &mut StdRng, id: i64, epoch: NaiveDate) -> User {
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    let email: String = SafeEmail().fake_with_rng(rng);
    let country = STUDENT_COUNTRIES
        .choose(rng)
        .copied()
        .unwrap_or("India")
        .to_string();
    let status = if rng.gen_ratio(4, 5) {
        AccountStatus::Active
    } else {
        AccountStatus::Pending
    };
    let created_at = epoch + Duration::days(rng.gen_range(0..180));

    User {
        id,
        uuid: format!(
            "{}-{}-{:03}",
            UserRole::Student.code_prefix(),
            created_at.year(),
            id
        ),
        name: format!("{first} {last}"),
        email,
        role: UserRole::Student,
        status,
        country,
        phone: None,
        created_at,
        last_login: None,
    }
}

//! Startup seeding: the bootstrap admin account and the sample catalogue

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        user::{NewUser, Role},
        vacation::NewVacation,
    },
    password::hash_password,
    repositories::{UserRepository, VacationRepository},
};

/// Destination, description, start offset from today in days, length in days,
/// price, image
type SampleVacation = (&'static str, &'static str, i64, u64, f64, &'static str);

const SAMPLE_VACATIONS: &[SampleVacation] = &[
    ("Paris, France", "Romantic city tour with museums and food.", -4, 10, 2500.0, "paris.jpg"),
    ("Tokyo, Japan", "Tech, temples and cherry blossoms.", -1, 10, 3100.0, "tokyo.jpg"),
    ("New York, USA", "City that never sleeps.", 7, 9, 2700.0, "ny.jpg"),
    ("Rome, Italy", "Ancient monuments and pasta.", 21, 8, 1800.0, "rome.jpg"),
    ("Dubai, UAE", "Skyscrapers and desert safari.", 35, 7, 2200.0, "dubai.jpg"),
    ("Bangkok, Thailand", "Markets and beaches.", 50, 10, 1500.0, "bangkok.jpg"),
    ("Barcelona, Spain", "Gaudi architecture.", 64, 8, 2100.0, "barcelona.jpg"),
    ("Santorini, Greece", "Sunsets and relaxation.", 80, 7, 2600.0, "santorini.jpg"),
    ("Seoul, South Korea", "K-culture and food.", 95, 9, 2300.0, "seoul.jpg"),
    ("London, UK", "Museums and royal sites.", 110, 8, 2400.0, "london.jpg"),
    ("Maldives", "Luxury villas.", 130, 7, 4000.0, "maldives.jpg"),
    ("Berlin, Germany", "Modern city and art.", 150, 9, 2000.0, "berlin.jpg"),
];

fn shift(day: NaiveDate, offset: i64) -> Option<NaiveDate> {
    if offset >= 0 {
        day.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        day.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

/// The sample catalogue, dated relative to `today`
pub fn sample_vacations(today: NaiveDate) -> Vec<NewVacation> {
    SAMPLE_VACATIONS
        .iter()
        .filter_map(|&(destination, description, offset, length, price, image_name)| {
            let start_date = shift(today, offset)?;
            let end_date = start_date.checked_add_days(Days::new(length))?;

            Some(NewVacation {
                destination: destination.to_string(),
                description: description.to_string(),
                start_date,
                end_date,
                price,
                image_name: image_name.to_string(),
            })
        })
        .collect()
}

/// Create the admin account unless a user with that email already exists.
///
/// Returns true when an account was created.
pub async fn bootstrap_admin(
    users: &UserRepository,
    email: &str,
    password: &str,
) -> ApiResult<bool> {
    if users.find_by_email(email).await?.is_some() {
        info!("Admin account {} already present", email);
        return Ok(false);
    }

    let admin = NewUser {
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        role: Role::Admin,
    };

    match users.create(&admin).await {
        Ok(user) => {
            info!("Created admin account {} ({})", user.id, user.email);
            Ok(true)
        }
        // Another instance won the race
        Err(e) if e.is_unique_violation() => Ok(false),
        Err(e) => Err(ApiError::from(e)),
    }
}

/// Insert the sample catalogue when no vacation is stored yet.
///
/// Returns the number of vacations inserted.
pub async fn seed_sample_vacations(
    vacations: &VacationRepository,
    today: NaiveDate,
) -> ApiResult<usize> {
    if vacations.count().await? > 0 {
        info!("Vacations already present, skipping sample data");
        return Ok(0);
    }

    let catalogue = sample_vacations(today);
    for vacation in &catalogue {
        vacations.create(vacation).await?;
    }

    info!("Seeded {} sample vacations", catalogue.len());
    Ok(catalogue.len())
}

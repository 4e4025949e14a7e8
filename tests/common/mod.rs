#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};
use student_registry::infrastructure::database;
use student_registry::models::{FacultyDtoIn, StudentDtoIn, StudentDtoOut};
use student_registry::services::{FacultyService, StudentService};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("student_registry=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

pub async fn setup_test_db() -> DatabaseConnection {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub fn faculty(name: &str, color: &str) -> FacultyDtoIn {
    FacultyDtoIn {
        name: name.to_string(),
        color: color.to_string(),
    }
}

pub fn student(name: &str, age: i32, faculty_id: i32) -> StudentDtoIn {
    StudentDtoIn {
        name: name.to_string(),
        age,
        faculty_id,
    }
}

/// Creates one faculty and `count` students in it, returning the students
pub async fn seed_students(db: &DatabaseConnection, count: usize) -> Vec<StudentDtoOut> {
    let faculties = FacultyService::new(db.clone());
    let students = StudentService::new(db.clone());
    let house = faculties.create(faculty("Hufflepuff", "yellow")).await.unwrap();

    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let s = students
            .create(student(&format!("Student {}", i + 1), 11 + i as i32, house.id))
            .await
            .unwrap();
        created.push(s);
    }
    created
}

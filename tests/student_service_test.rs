mod common;

use chrono::{Duration, Utc};
use common::{faculty, seed_students, setup_test_db, student};
use sea_orm::Set;
use student_registry::entities::students;
use student_registry::services::error::{ErrorKind, NotFoundKind, ServiceError};
use student_registry::services::{FacultyService, StudentService};
use student_registry::stores::StudentStore;

#[tokio::test]
async fn test_faculty_of_student_scenario() {
    let db = setup_test_db().await;
    let faculties = FacultyService::new(db.clone());
    let students = StudentService::new(db);

    let gryffindor = faculties.create(faculty("Gryffindor", "red")).await.unwrap();
    let harry = students.create(student("Harry", 11, gryffindor.id)).await.unwrap();
    assert_eq!(harry.faculty.as_ref(), Some(&gryffindor));

    let house = students.faculty_of(harry.id).await.unwrap().unwrap();
    assert_eq!(house.name, "Gryffindor");
    assert_eq!(house.color, "red");
}

#[tokio::test]
async fn test_create_with_unknown_faculty_persists_nothing() {
    let db = setup_test_db().await;
    let service = StudentService::new(db);

    let err = service.create(student("Draco", 11, 99)).await.unwrap_err();
    assert!(matches!(err, ServiceError::FacultyNotFound(99)));
    assert_eq!(err.kind(), ErrorKind::NotFound(NotFoundKind::FacultyId));
    assert_eq!(service.total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_negative_age() {
    let db = setup_test_db().await;
    let faculties = FacultyService::new(db.clone());
    let service = StudentService::new(db);

    let house = faculties.create(faculty("Gryffindor", "red")).await.unwrap();
    let err = service.create(student("Nobody", -1, house.id)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_reassigns_faculty() {
    let db = setup_test_db().await;
    let faculties = FacultyService::new(db.clone());
    let service = StudentService::new(db);

    let gryffindor = faculties.create(faculty("Gryffindor", "red")).await.unwrap();
    let slytherin = faculties.create(faculty("Slytherin", "green")).await.unwrap();
    let created = service.create(student("Harry", 11, gryffindor.id)).await.unwrap();

    let updated = service
        .update(created.id, student("Harry Potter", 12, slytherin.id))
        .await
        .unwrap();
    assert_eq!(updated.name, "Harry Potter");
    assert_eq!(updated.age, 12);
    assert_eq!(updated.faculty, Some(slytherin.clone()));
    assert_eq!(service.get(created.id).await.unwrap(), updated);

    let err = service
        .update(created.id, student("Harry", 12, 404))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::FacultyNotFound(404)));
    // failed update leaves the row untouched
    assert_eq!(service.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_missing_student_fails() {
    let db = setup_test_db().await;
    let faculties = FacultyService::new(db.clone());
    let service = StudentService::new(db);

    let house = faculties.create(faculty("Gryffindor", "red")).await.unwrap();
    let err = service.update(7, student("Ghost", 100, house.id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(7)));
}

#[tokio::test]
async fn test_delete_returns_snapshot_then_get_fails() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());
    let seeded = seed_students(&db, 2).await;

    let deleted = service.delete(seeded[0].id).await.unwrap();
    assert_eq!(deleted, seeded[0]);

    let err = service.get(seeded[0].id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound(NotFoundKind::Student));
    assert_eq!(service.total_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_faculty_of_distinguishes_missing_student_from_missing_faculty() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());

    let orphan = StudentStore::save(
        &db,
        students::ActiveModel {
            name: Set("Myrtle".to_string()),
            age: Set(14),
            faculty_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(service.faculty_of(orphan.id).await.unwrap(), None);

    let err = service.faculty_of(orphan.id + 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(_)));
}

#[tokio::test]
async fn test_find_by_age_with_and_without_filter() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());
    let seeded = seed_students(&db, 4).await; // ages 11..=14

    let twelve = service.find_by_age(Some(12)).await.unwrap();
    assert_eq!(twelve, vec![seeded[1].clone()]);

    assert!(service.find_by_age(Some(40)).await.unwrap().is_empty());
    assert_eq!(service.find_by_age(None).await.unwrap(), seeded);
}

#[tokio::test]
async fn test_find_by_age_between_is_inclusive() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());
    let seeded = seed_students(&db, 5).await; // ages 11..=15

    let middle = service.find_by_age_between(12, 14).await.unwrap();
    assert_eq!(middle, seeded[1..4].to_vec());

    assert!(service.find_by_age_between(30, 40).await.unwrap().is_empty());
    // reversed bounds are not an error
    assert!(service.find_by_age_between(14, 12).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_aggregates() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());

    assert_eq!(service.total_count().await.unwrap(), 0);
    assert_eq!(service.average_age().await.unwrap(), None);

    seed_students(&db, 4).await; // ages 11, 12, 13, 14
    assert_eq!(service.total_count().await.unwrap(), 4);
    let average = service.average_age().await.unwrap().unwrap();
    assert!((average - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_most_recent_five_is_newest_first() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());

    assert!(service.most_recent_five().await.unwrap().is_empty());

    let base = Utc::now() - Duration::hours(1);
    let mut ids = Vec::new();
    for i in 0..7 {
        let saved = StudentStore::save(
            &db,
            students::ActiveModel {
                name: Set(format!("Student {}", i)),
                age: Set(11),
                faculty_id: Set(None),
                created_at: Set(base + Duration::minutes(i)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ids.push(saved.id);
    }

    let recent: Vec<i32> = service
        .most_recent_five()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    let expected: Vec<i32> = ids.iter().rev().take(5).copied().collect();
    assert_eq!(recent, expected);
}

#[tokio::test]
async fn test_most_recent_five_with_fewer_students() {
    let db = setup_test_db().await;
    let service = StudentService::new(db.clone());
    seed_students(&db, 3).await;

    assert_eq!(service.most_recent_five().await.unwrap().len(), 3);
}

pub mod avatars;
pub mod faculties;
pub mod health;
pub mod students;

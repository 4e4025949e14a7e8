use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDtoIn {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Faculty name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(length(max = 64, message = "Color must be at most 64 characters"))]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDtoOut {
    pub id: i32,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentDtoIn {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Student name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: i32,
    pub faculty_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDtoOut {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub faculty: Option<FacultyDtoOut>,
}

/// Avatar metadata as exposed to clients; the inline bytes are never included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDto {
    pub id: i32,
    pub file_path: String,
    pub file_size: i64,
    pub media_type: String,
    pub student_id: i32,
}

/// Raw avatar bytes with the media type they were uploaded as
#[derive(Debug, Clone)]
pub struct AvatarContent {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_dto_in_validation() {
        let ok = StudentDtoIn {
            name: "Harry".to_string(),
            age: 11,
            faculty_id: 1,
        };
        assert!(ok.validate().is_ok());

        let bad = StudentDtoIn {
            name: String::new(),
            age: -1,
            faculty_id: 1,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn test_avatar_dto_is_camel_case() {
        let dto = AvatarDto {
            id: 1,
            file_path: "avatars/7.png".to_string(),
            file_size: 500,
            media_type: "image/png".to_string(),
            student_id: 7,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["filePath"], "avatars/7.png");
        assert_eq!(json["mediaType"], "image/png");
        assert_eq!(json["studentId"], 7);
    }
}

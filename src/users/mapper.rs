use super::{dto::UserDto, repo_types::UserEntity};

impl From<UserEntity> for UserDto {
    fn from(e: UserEntity) -> Self {
        Self {
            user_id: e.id,
            login: Some(e.login),
            password: None, // the stored hash never leaves the service
            email: e.email,
            full_name: e.full_name,
        }
    }
}

impl From<UserDto> for UserEntity {
    fn from(d: UserDto) -> Self {
        Self {
            id: d.user_id,
            login: d.login.unwrap_or_default(),
            password: d.password.unwrap_or_default(),
            email: d.email,
            full_name: d.full_name,
        }
    }
}

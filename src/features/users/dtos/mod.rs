mod user_dto;

pub use user_dto::{
    AdminUpdateUserDto, ChangePasswordDto, UpdateProfileDto, UserQueryParams, UserResponseDto,
};

pub mod prompt_dto;

pub use prompt_dto::{
    CreatePromptVersionDto, CreatePromptVersionResponseDto, PromptQueryParams,
    PromptVersionResponseDto, UpvoteResponseDto,
};

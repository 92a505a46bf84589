mod requests;
mod responses;

pub use requests::{
    CreatePostRequest, DeletePostRequest, EditPostRequest, LoginRequest, RegisterRequest,
};
pub use responses::{PAGE_SIZE, PostPage, ProfileResponse};

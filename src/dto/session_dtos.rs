use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct SessionRequest {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
}
